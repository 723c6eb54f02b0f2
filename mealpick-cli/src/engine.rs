//! Store and engine construction shared by the subcommands.

use std::io::{BufReader, Write};

use camino::Utf8Path;
use log::debug;
use mealpick_core::{CatalogStore, FoodId, FoodItem, SqliteStore, SystemClock};
use mealpick_recommender::{HistoryLedger, Recommender};
use mealpick_scorer::{HistoryScorer, ScoringPolicy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::CliError;
use crate::fs::{ensure_parent_dir, open_utf8_file};

/// Engine wired to one SQLite store and the wall clock.
pub(crate) type CliEngine<'store> = Recommender<
    &'store SqliteStore,
    HistoryScorer<&'store SqliteStore>,
    &'store SqliteStore,
>;

/// Open (creating if needed) the database at `path`.
pub(crate) fn open_store(path: &Utf8Path) -> Result<SqliteStore, CliError> {
    ensure_parent_dir(path).map_err(|source| CliError::CreateDatabaseDir {
        path: path.to_path_buf(),
        source,
    })?;
    let store = SqliteStore::open(path.as_std_path())?;
    debug!("opened mealpick database at {path}");
    Ok(store)
}

/// Load a JSON scoring policy, or the default policy when no path is given.
pub(crate) fn load_policy(path: Option<&Utf8Path>) -> Result<ScoringPolicy, CliError> {
    let Some(path) = path else {
        return Ok(ScoringPolicy::default());
    };
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPolicy {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParsePolicy {
        path: path.to_path_buf(),
        source,
    })
}

/// Assemble the engine over `store`.
///
/// A `seed` makes recommendations reproducible; without one the generator
/// is seeded from the operating system.
pub(crate) fn build_engine(
    store: &SqliteStore,
    policy: ScoringPolicy,
    seed: Option<u64>,
) -> Result<CliEngine<'_>, CliError> {
    let scorer = HistoryScorer::with_policy(store, SystemClock, policy)?;
    let ledger = HistoryLedger::new(store, SystemClock);
    let rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    Ok(Recommender::new(store, scorer, ledger, rng))
}

/// Fetch the catalog item `food_id`, failing when it does not exist.
pub(crate) fn require_item(store: &SqliteStore, food_id: &FoodId) -> Result<FoodItem, CliError> {
    store
        .get_item(food_id)?
        .ok_or_else(|| CliError::UnknownFood {
            food_id: food_id.clone(),
        })
}

/// Write `value` to `writer` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}
