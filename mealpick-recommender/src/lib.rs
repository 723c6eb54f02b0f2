//! Recommendation engine for Mealpick.
//!
//! - [`select`] turns `(item, score)` pairs into one weighted random pick.
//! - [`HistoryLedger`] records accept and skip decisions, retracting the
//!   latest accept of an item when that item is skipped.
//! - [`Recommender`] ties a catalog, a [`Scorer`](mealpick_core::Scorer) and
//!   a ledger together behind `recommend`, `record_decision` and `explain`.

#![forbid(unsafe_code)]

mod engine;
mod error;
mod ledger;
mod selection;

pub use engine::Recommender;
pub use error::RecommendError;
pub use ledger::HistoryLedger;
pub use selection::select;
