//! Errors raised by catalog and interaction stores.

use thiserror::Error;

use crate::{DecisionId, ReviewId};

/// Boxed source error carried by store failures.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by [`CatalogStore`](super::CatalogStore) and
/// [`InteractionStore`](super::InteractionStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or read.
    #[error("store unavailable while trying to {operation}")]
    Unavailable {
        /// Description of the failed operation.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: BoxedSource,
    },
    /// A write or transaction could not be completed.
    #[error("failed to {operation}")]
    Persistence {
        /// Description of the failed operation.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: BoxedSource,
    },
    /// A persisted row could not be decoded.
    #[error("corrupt data while trying to {operation}: {detail}")]
    Corrupt {
        /// Description of the failed operation.
        operation: &'static str,
        /// What was wrong with the row.
        detail: String,
    },
    /// No decision exists with the given identifier.
    #[error("decision {id} does not exist")]
    UnknownDecision {
        /// Identifier that was looked up.
        id: DecisionId,
    },
    /// The decision is already linked to a different review.
    #[error("decision {id} is already linked to review {existing}")]
    ReviewConflict {
        /// Decision being linked.
        id: DecisionId,
        /// Review the decision is already linked to.
        existing: ReviewId,
    },
}

impl StoreError {
    /// Build an [`StoreError::Unavailable`] from any error or message.
    pub fn unavailable(operation: &'static str, source: impl Into<BoxedSource>) -> Self {
        Self::Unavailable {
            operation,
            source: source.into(),
        }
    }

    /// Build a [`StoreError::Persistence`] from any error or message.
    pub fn persistence(operation: &'static str, source: impl Into<BoxedSource>) -> Self {
        Self::Persistence {
            operation,
            source: source.into(),
        }
    }
}
