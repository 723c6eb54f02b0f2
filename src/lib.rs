//! Facade crate for the Mealpick recommendation engine.
//!
//! This crate re-exports the core domain types, the history scorer and the
//! recommender. The SQLite store and the in-memory test stores sit behind
//! feature flags.

#![forbid(unsafe_code)]

pub use mealpick_core::{
    CatalogStore, Clock, ConsumptionRecord, Cuisine, Decision, DecisionId, DecisionRecord,
    DecisionTransaction, FixedClock, FoodId, FoodItem, InteractionStore, InvalidDecision,
    ManualClock, ReviewId, ScoreBreakdown, Scorer, StoreError, SystemClock, UnknownCuisine,
    default_catalog, seed_catalog, whole_days_between,
};
pub use mealpick_recommender::{HistoryLedger, RecommendError, Recommender, select};
pub use mealpick_scorer::{HistoryScorer, RatingBand, RecencyBand, ScorerError, ScoringPolicy};

#[cfg(feature = "store-sqlite")]
pub use mealpick_core::{SqliteStore, SqliteStoreError};

#[cfg(feature = "test-support")]
pub use mealpick_core::test_support;
