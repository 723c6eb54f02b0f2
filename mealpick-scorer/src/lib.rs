//! Desirability scoring for Mealpick food items.
//!
//! [`HistoryScorer`] implements the [`Scorer`](mealpick_core::Scorer) trait
//! by reading a user's decisions and consumption history from an
//! [`InteractionStore`](mealpick_core::InteractionStore). The arithmetic
//! lives in [`ScoringPolicy`], which is pure and can be evaluated without a
//! store:
//!
//! ```text
//! score = max(floor, base + accept/skip + rating + recency)
//! ```
//!
//! The default policy uses a base of 100 and a floor of 10, so every item
//! keeps a non-zero chance of being picked.

#![forbid(unsafe_code)]

mod error;
mod history;
mod policy;

pub use error::ScorerError;
pub use history::HistoryScorer;
pub use policy::{RatingBand, RecencyBand, ScoringPolicy};
