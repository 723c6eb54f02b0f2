//! Read-only commands: `recommend` and `explain`.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use mealpick_core::{FoodId, FoodItem, ScoreBreakdown};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::engine::{build_engine, load_policy, open_store, require_item, write_json};
use crate::{
    ARG_DATABASE, ARG_FOOD_ID, ARG_POLICY, ARG_SEED, CliError, DEFAULT_DATABASE,
    ENV_EXPLAIN_FOOD_ID,
};

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every catalog item from the stored history and pick \
                 one at random, weighted by score. Prints the item as JSON, \
                 or null when the catalog is empty.",
    about = "Recommend one catalog item"
)]
#[ortho_config(prefix = "MEALPICK")]
pub(crate) struct RecommendArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Seed for reproducible picks.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// JSON file overriding the scoring policy.
    #[arg(long = ARG_POLICY, value_name = "path")]
    #[serde(default)]
    pub(crate) policy: Option<Utf8PathBuf>,
}

impl RecommendArgs {
    fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RecommendConfig::from(merged))
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    /// Path to the SQLite database.
    pub(crate) database: Utf8PathBuf,
    /// Seed for the random source.
    pub(crate) seed: Option<u64>,
    /// Optional scoring policy file.
    pub(crate) policy: Option<Utf8PathBuf>,
}

impl From<RecommendArgs> for RecommendConfig {
    fn from(args: RecommendArgs) -> Self {
        Self {
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            seed: args.seed,
            policy: args.policy,
        }
    }
}

pub(crate) fn run_recommend(args: RecommendArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    execute_recommend(&args.into_config()?, writer)
}

pub(crate) fn execute_recommend(
    config: &RecommendConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let policy = load_policy(config.policy.as_deref())?;
    let engine = build_engine(&store, policy, config.seed)?;
    let picked = engine.recommend()?;
    write_json(writer, &picked)
}

/// CLI arguments for the `explain` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the accept/skip, rating and recency components of \
                 one item's score together with the floored total.",
    about = "Show how an item's score is made up"
)]
#[ortho_config(prefix = "MEALPICK")]
pub(crate) struct ExplainArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// JSON file overriding the scoring policy.
    #[arg(long = ARG_POLICY, value_name = "path")]
    #[serde(default)]
    pub(crate) policy: Option<Utf8PathBuf>,
    /// Identifier of the catalog item to explain.
    #[arg(long = ARG_FOOD_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) food_id: Option<String>,
}

impl ExplainArgs {
    fn into_config(self) -> Result<ExplainConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExplainConfig::try_from(merged)
    }
}

/// Resolved `explain` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExplainConfig {
    /// Path to the SQLite database.
    pub(crate) database: Utf8PathBuf,
    /// Optional scoring policy file.
    pub(crate) policy: Option<Utf8PathBuf>,
    /// Item to explain.
    pub(crate) food_id: FoodId,
}

impl TryFrom<ExplainArgs> for ExplainConfig {
    type Error = CliError;

    fn try_from(args: ExplainArgs) -> Result<Self, Self::Error> {
        let food_id = args.food_id.ok_or(CliError::MissingArgument {
            field: ARG_FOOD_ID,
            env: ENV_EXPLAIN_FOOD_ID,
        })?;
        Ok(Self {
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            policy: args.policy,
            food_id: FoodId::new(food_id),
        })
    }
}

#[derive(Debug, Serialize)]
struct Explanation<'a> {
    item: &'a FoodItem,
    #[serde(flatten)]
    breakdown: ScoreBreakdown,
}

pub(crate) fn run_explain(args: ExplainArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    execute_explain(&args.into_config()?, writer)
}

pub(crate) fn execute_explain(
    config: &ExplainConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let item = require_item(&store, &config.food_id)?;
    let policy = load_policy(config.policy.as_deref())?;
    // Explaining never draws, so the seed is irrelevant.
    let engine = build_engine(&store, policy, Some(0))?;
    let breakdown = engine.explain(&item)?;
    write_json(
        writer,
        &Explanation {
            item: &item,
            breakdown,
        },
    )
}
