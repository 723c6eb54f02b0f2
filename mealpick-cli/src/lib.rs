//! Command-line interface for the Mealpick recommendation engine.
//!
//! Each subcommand opens a SQLite database, runs one engine operation and
//! prints the outcome as JSON. Options layer CLI flags over environment
//! variables (`MEALPICK_CMDS_<COMMAND>_<OPTION>`) and configuration files.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod engine;
mod error;
mod fs;
mod history;
mod recommend;
mod seed;

pub use error::CliError;

use history::{DecideArgs, ReviewArgs};
use recommend::{ExplainArgs, RecommendArgs};
use seed::SeedArgs;

const DEFAULT_DATABASE: &str = "mealpick.db";

const ARG_DATABASE: &str = "database";
const ARG_POLICY: &str = "policy";
const ARG_SEED: &str = "seed";
const ARG_FOOD_ID: &str = "food-id";
const ARG_DECISION: &str = "decision";
const ARG_DECISION_ID: &str = "decision-id";
const ARG_RATING: &str = "rating";
const ARG_EATEN_AT: &str = "eaten-at";

const ENV_DECIDE_FOOD_ID: &str = "MEALPICK_CMDS_DECIDE_FOOD_ID";
const ENV_DECIDE_DECISION: &str = "MEALPICK_CMDS_DECIDE_DECISION";
const ENV_REVIEW_FOOD_ID: &str = "MEALPICK_CMDS_REVIEW_FOOD_ID";
const ENV_REVIEW_RATING: &str = "MEALPICK_CMDS_REVIEW_RATING";
const ENV_EXPLAIN_FOOD_ID: &str = "MEALPICK_CMDS_EXPLAIN_FOOD_ID";

/// Run the Mealpick CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration or the
/// requested operation fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Seed(args) => seed::run_seed(args, writer),
        Command::Recommend(args) => recommend::run_recommend(args, writer),
        Command::Decide(args) => history::run_decide(args, writer),
        Command::Review(args) => history::run_review(args, writer),
        Command::Explain(args) => recommend::run_explain(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "mealpick",
    about = "Recommend a meal from your accept, skip and review history",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database and seed the starter catalog.
    Seed(SeedArgs),
    /// Recommend one catalog item.
    Recommend(RecommendArgs),
    /// Record an accept or skip for a catalog item.
    Decide(DecideArgs),
    /// Record a rated meal for a catalog item.
    Review(ReviewArgs),
    /// Show how an item's score is made up.
    Explain(ExplainArgs),
}

#[cfg(test)]
mod tests;
