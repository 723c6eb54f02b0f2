//! Core domain types for the Mealpick recommendation engine.
//!
//! The crate defines the catalog and interaction records, the store traits
//! the engine consumes, and the [`Scorer`] trait used to rank items. A
//! SQLite-backed store is available behind the `store-sqlite` feature and
//! in-memory stores behind `test-support`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod catalog;
mod clock;
mod decision;
mod food;
mod scorer;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{default_catalog, seed_catalog};
pub use clock::{Clock, FixedClock, ManualClock, SystemClock, whole_days_between};
pub use decision::{
    ConsumptionRecord, Decision, DecisionId, DecisionRecord, InvalidDecision, ReviewId,
};
pub use food::{Cuisine, FoodId, FoodItem, UnknownCuisine};
pub use scorer::{ScoreBreakdown, Scorer};
pub use store::{CatalogStore, DecisionTransaction, InteractionStore, StoreError};

#[cfg(feature = "store-sqlite")]
pub use store::{SqliteStore, SqliteStoreError};
