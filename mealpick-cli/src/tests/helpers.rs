//! Test helpers for temporary databases and captured command output.

use camino::Utf8PathBuf;
use serde_json::Value;
use tempfile::TempDir;

use crate::seed::{SeedConfig, execute_seed};

/// A throwaway database directory.
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) database: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            database: root.join("data/mealpick.db"),
            _dir: dir,
        }
    }

    /// Seed the starter catalog and return the seeded items as JSON.
    pub(super) fn seeded(self) -> (Self, Vec<Value>) {
        let output = capture(|writer| {
            execute_seed(
                &SeedConfig {
                    database: self.database.clone(),
                },
                writer,
            )
        });
        let items = match output {
            Value::Array(items) => items,
            other => panic!("expected seeded items, found {other}"),
        };
        (self, items)
    }
}

/// Run a command against an in-memory writer and parse its JSON output.
pub(super) fn capture<F>(command: F) -> Value
where
    F: FnOnce(&mut dyn std::io::Write) -> Result<(), crate::CliError>,
{
    let mut buffer = Vec::new();
    command(&mut buffer).expect("command succeeds");
    serde_json::from_slice(&buffer).expect("command prints JSON")
}

/// Find the seeded item with `category` and return its food id.
pub(super) fn food_id_of(items: &[Value], category: &str) -> String {
    items
        .iter()
        .find(|item| item["category"] == category)
        .and_then(|item| item["id"].as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| panic!("no seeded item named {category}"))
}
