//! Commands that write history: `decide` and `review`.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use log::info;
use mealpick_core::{
    Clock, ConsumptionRecord, Decision, DecisionId, FoodId, ReviewId, SystemClock,
};
use mealpick_recommender::HistoryLedger;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::engine::{open_store, require_item, write_json};
use crate::{
    ARG_DATABASE, ARG_DECISION, ARG_DECISION_ID, ARG_EATEN_AT, ARG_FOOD_ID, ARG_RATING, CliError,
    DEFAULT_DATABASE, ENV_DECIDE_DECISION, ENV_DECIDE_FOOD_ID, ENV_REVIEW_FOOD_ID,
    ENV_REVIEW_RATING,
};

const MAX_RATING: f64 = 5.0;

/// CLI arguments for the `decide` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Record whether a recommendation was taken. A skip also \
                 removes the most recent accept of the same item.",
    about = "Record an accept or skip for a catalog item"
)]
#[ortho_config(prefix = "MEALPICK")]
pub(crate) struct DecideArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the catalog item.
    #[arg(long = ARG_FOOD_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) food_id: Option<String>,
    /// Either `accept` or `skip`.
    #[arg(long = ARG_DECISION, value_name = "accept|skip")]
    #[serde(default)]
    pub(crate) decision: Option<String>,
}

impl DecideArgs {
    fn into_config(self) -> Result<DecideConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        DecideConfig::try_from(merged)
    }
}

/// Resolved `decide` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecideConfig {
    /// Path to the SQLite database.
    pub(crate) database: Utf8PathBuf,
    /// Item the decision is about.
    pub(crate) food_id: FoodId,
    /// Parsed decision.
    pub(crate) decision: Decision,
}

impl TryFrom<DecideArgs> for DecideConfig {
    type Error = CliError;

    fn try_from(args: DecideArgs) -> Result<Self, Self::Error> {
        let food_id = args.food_id.ok_or(CliError::MissingArgument {
            field: ARG_FOOD_ID,
            env: ENV_DECIDE_FOOD_ID,
        })?;
        let decision = args.decision.ok_or(CliError::MissingArgument {
            field: ARG_DECISION,
            env: ENV_DECIDE_DECISION,
        })?;
        Ok(Self {
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            food_id: FoodId::new(food_id),
            decision: decision.parse()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct RecordedDecision {
    decision_id: DecisionId,
    food_id: FoodId,
    decision: Decision,
}

pub(crate) fn run_decide(args: DecideArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    execute_decide(&args.into_config()?, writer)
}

pub(crate) fn execute_decide(config: &DecideConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let item = require_item(&store, &config.food_id)?;
    let decision_id = HistoryLedger::new(&store, SystemClock)
        .record_decision(&item.id, config.decision)?;
    write_json(
        writer,
        &RecordedDecision {
            decision_id,
            food_id: item.id,
            decision: config.decision,
        },
    )
}

/// CLI arguments for the `review` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Record that a catalog item was eaten, with a rating from \
                 0 to 5 in steps of 0.5. Pass --decision-id to link the review to the \
                 accept that led to the meal.",
    about = "Record a rated meal for a catalog item"
)]
#[ortho_config(prefix = "MEALPICK")]
pub(crate) struct ReviewArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the catalog item.
    #[arg(long = ARG_FOOD_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) food_id: Option<String>,
    /// Rating between 0 and 5 in steps of 0.5.
    #[arg(long = ARG_RATING, value_name = "n")]
    #[serde(default)]
    pub(crate) rating: Option<f64>,
    /// When the meal was eaten, as an RFC 3339 timestamp. Defaults to now.
    #[arg(long = ARG_EATEN_AT, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) eaten_at: Option<String>,
    /// Decision to link the review to.
    #[arg(long = ARG_DECISION_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) decision_id: Option<String>,
}

impl ReviewArgs {
    fn into_config(self) -> Result<ReviewConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReviewConfig::try_from(merged)
    }
}

/// Resolved `review` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReviewConfig {
    /// Path to the SQLite database.
    pub(crate) database: Utf8PathBuf,
    /// Item that was eaten.
    pub(crate) food_id: FoodId,
    /// Validated rating.
    pub(crate) rating: f64,
    /// Explicit meal time; `None` means now.
    pub(crate) eaten_at: Option<DateTime<Utc>>,
    /// Decision to link the review to.
    pub(crate) decision_id: Option<DecisionId>,
}

impl TryFrom<ReviewArgs> for ReviewConfig {
    type Error = CliError;

    fn try_from(args: ReviewArgs) -> Result<Self, Self::Error> {
        let food_id = args.food_id.ok_or(CliError::MissingArgument {
            field: ARG_FOOD_ID,
            env: ENV_REVIEW_FOOD_ID,
        })?;
        let rating = args.rating.ok_or(CliError::MissingArgument {
            field: ARG_RATING,
            env: ENV_REVIEW_RATING,
        })?;
        if !is_rating_step(rating) {
            return Err(CliError::InvalidRating { rating });
        }
        let eaten_at = args.eaten_at.map(|raw| parse_timestamp(&raw)).transpose()?;
        Ok(Self {
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            food_id: FoodId::new(food_id),
            rating,
            eaten_at,
            decision_id: args.decision_id.map(DecisionId::new),
        })
    }
}

// Ratings use half-point steps from 0 to 5.
#[expect(
    clippy::float_arithmetic,
    reason = "doubling a rating exposes off-step fractions"
)]
fn is_rating_step(rating: f64) -> bool {
    (0.0..=MAX_RATING).contains(&rating) && (rating * 2.0).fract() == 0.0
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|source| CliError::InvalidTimestamp {
            input: raw.to_owned(),
            source,
        })
}

#[derive(Debug, Serialize)]
struct RecordedReview {
    review_id: ReviewId,
    food_id: FoodId,
    rating: f64,
    ate_at: DateTime<Utc>,
    linked_decision: Option<DecisionId>,
}

pub(crate) fn run_review(args: ReviewArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    execute_review(&args.into_config()?, writer)
}

pub(crate) fn execute_review(config: &ReviewConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let item = require_item(&store, &config.food_id)?;
    let clock = SystemClock;
    let record = ConsumptionRecord {
        food_id: item.id,
        rating: config.rating,
        ate_at: config.eaten_at.unwrap_or_else(|| clock.now()),
    };

    let review_id = ReviewId::generate();
    let link = config
        .decision_id
        .as_ref()
        .map(|decision_id| (decision_id, &review_id));
    store.record_review(&record, link)?;
    info!(
        "recorded review {review_id} of {} rated {}",
        record.food_id, record.rating
    );

    write_json(
        writer,
        &RecordedReview {
            review_id,
            food_id: record.food_id,
            rating: record.rating,
            ate_at: record.ate_at,
            linked_decision: config.decision_id.clone(),
        },
    )
}
