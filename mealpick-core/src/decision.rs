//! Interaction records: accept/skip decisions and consumption reviews.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::FoodId;

/// Identifier of a stored [`DecisionRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DecisionId(String);

impl DecisionId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a review authored outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ReviewId(String);

impl ReviewId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user's response to a recommended item.
///
/// # Examples
/// ```
/// use mealpick_core::Decision;
///
/// assert!(Decision::Accept.is_accepted());
/// assert_eq!(Decision::from_accepted(false), Decision::Skip);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Decision {
    /// The recommendation was taken.
    Accept,
    /// The recommendation was passed over.
    Skip,
}

impl Decision {
    /// Map the stored `is_accepted` flag onto a decision.
    #[must_use]
    pub const fn from_accepted(accepted: bool) -> Self {
        if accepted { Self::Accept } else { Self::Skip }
    }

    /// Report whether this decision is an accept.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Lowercase name used in logs and command-line input.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing anything other than `accept` or `skip`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown decision '{input}' (expected accept or skip)")]
pub struct InvalidDecision {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Decision {
    type Err = InvalidDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "skip" => Ok(Self::Skip),
            _ => Err(InvalidDecision {
                input: s.to_owned(),
            }),
        }
    }
}

/// A persisted accept or skip.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRecord {
    /// Record identifier.
    pub id: DecisionId,
    /// Item the decision refers to.
    pub food_id: FoodId,
    /// Whether the item was accepted or skipped.
    pub decision: Decision,
    /// When the decision was made.
    pub created_at: DateTime<Utc>,
    /// Review completed for this decision, once one exists.
    pub linked_review_id: Option<ReviewId>,
}

impl DecisionRecord {
    /// Report whether the record is an accept.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.decision.is_accepted()
    }
}

/// A completed review of an item: a rating and the date it was eaten.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumptionRecord {
    /// Item that was eaten.
    pub food_id: FoodId,
    /// Rating on a half-point scale, typically `0.0..=5.0`.
    pub rating: f64,
    /// When the item was eaten.
    pub ate_at: DateTime<Utc>,
}
