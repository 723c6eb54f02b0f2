//! Error types emitted by the Mealpick CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use mealpick_core::{FoodId, InvalidDecision, SqliteStoreError, StoreError};
use mealpick_recommender::RecommendError;
use mealpick_scorer::ScorerError;
use thiserror::Error;

/// Errors emitted by the Mealpick CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name of the option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The decision option was neither `accept` nor `skip`.
    #[error(transparent)]
    InvalidDecision(#[from] InvalidDecision),
    /// The rating is not a half-point step within the rating scale.
    #[error("rating {rating} is not a multiple of 0.5 within 0.0..=5.0")]
    InvalidRating {
        /// Rejected rating.
        rating: f64,
    },
    /// The eaten-at option is not an RFC 3339 timestamp.
    #[error("eaten-at {input:?} is not an RFC 3339 timestamp: {source}")]
    InvalidTimestamp {
        /// Rejected input.
        input: String,
        /// Parser error from `chrono`.
        #[source]
        source: chrono::ParseError,
    },
    /// The food id does not name a catalog item.
    #[error("no catalog item has id {food_id}")]
    UnknownFood {
        /// Requested identifier.
        food_id: FoodId,
    },
    /// Creating the directory that holds the database failed.
    #[error("failed to create parent directory for {path:?}: {source}")]
    CreateDatabaseDir {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite store failed.
    #[error(transparent)]
    OpenStore(#[from] SqliteStoreError),
    /// Opening the scoring policy file failed.
    #[error("failed to open scoring policy at {path:?}: {source}")]
    OpenPolicy {
        /// Policy file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Scoring policy JSON could not be decoded.
    #[error("failed to parse scoring policy JSON at {path:?}: {source}")]
    ParsePolicy {
        /// Policy file path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The scoring policy was rejected.
    #[error(transparent)]
    InvalidPolicy(#[from] ScorerError),
    /// A direct store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The engine rejected or failed the operation.
    #[error(transparent)]
    Engine(#[from] RecommendError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
