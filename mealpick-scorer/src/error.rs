//! Error types raised while configuring history scoring.

use thiserror::Error;

/// Errors raised when a [`ScoringPolicy`](crate::ScoringPolicy) is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScorerError {
    /// The policy violates one of its structural rules.
    #[error("invalid scoring policy: {reason}")]
    InvalidPolicy {
        /// Human-readable description of the violated rule.
        reason: String,
    },
}

impl ScorerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            reason: reason.into(),
        }
    }
}
