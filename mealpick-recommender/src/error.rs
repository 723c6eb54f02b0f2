//! Errors surfaced by the recommendation engine.

use mealpick_core::{DecisionId, FoodId, ReviewId, StoreError};
use thiserror::Error;

/// Errors raised while recommending items or recording decisions.
///
/// An empty catalog is not an error: [`Recommender::recommend`] returns
/// `Ok(None)` instead.
///
/// [`Recommender::recommend`]: crate::Recommender::recommend
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The catalog or interaction history could not be read.
    #[error("store unavailable while trying to {operation}")]
    StoreUnavailable {
        /// Description of the failed read.
        operation: &'static str,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
    /// Recording a decision failed; no part of it was persisted.
    #[error("failed to persist decision for food {food_id}")]
    PersistenceFailure {
        /// Item the decision was about.
        food_id: FoodId,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
    /// A review was attached to a decision that does not exist.
    #[error("decision {id} does not exist")]
    UnknownDecision {
        /// Requested decision identifier.
        id: DecisionId,
    },
    /// The decision is already linked to a different review.
    #[error("decision {id} is already linked to review {existing}")]
    ReviewConflict {
        /// Decision that was targeted.
        id: DecisionId,
        /// Review already linked to it.
        existing: ReviewId,
    },
    /// Linking a review could not be written.
    #[error("failed to link a review to decision {id}")]
    ReviewFailure {
        /// Decision that was targeted.
        id: DecisionId,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
}

impl RecommendError {
    pub(crate) fn unavailable(operation: &'static str) -> impl Fn(StoreError) -> Self {
        move |source| Self::StoreUnavailable { operation, source }
    }
}
