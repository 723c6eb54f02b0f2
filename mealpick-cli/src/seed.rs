//! Seed command implementation.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use mealpick_core::{default_catalog, seed_catalog};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::engine::{open_store, write_json};
use crate::{ARG_DATABASE, CliError, DEFAULT_DATABASE};

/// CLI arguments for the `seed` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Create the SQLite database if needed and make sure every \
                 starter catalog entry exists. Running it again keeps the \
                 existing food ids.",
    about = "Create the database and seed the starter catalog"
)]
#[ortho_config(prefix = "MEALPICK")]
pub(crate) struct SeedArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl SeedArgs {
    fn into_config(self) -> Result<SeedConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(SeedConfig::from(merged))
    }
}

/// Resolved `seed` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SeedConfig {
    /// Path to the SQLite database.
    pub(crate) database: Utf8PathBuf,
}

impl From<SeedArgs> for SeedConfig {
    fn from(args: SeedArgs) -> Self {
        Self {
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        }
    }
}

pub(crate) fn run_seed(args: SeedArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    execute_seed(&args.into_config()?, writer)
}

pub(crate) fn execute_seed(config: &SeedConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let items = seed_catalog(&store, default_catalog())?;
    info!("catalog at {} holds {} seeded items", config.database, items.len());
    write_json(writer, &items)
}
