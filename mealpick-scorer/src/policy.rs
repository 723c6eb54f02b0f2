//! Tunable constants and the pure scoring arithmetic.

use mealpick_core::ScoreBreakdown;
use serde::{Deserialize, Serialize};

use crate::ScorerError;

/// Score awarded when the average rating reaches `min_average`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingBand {
    /// Inclusive lower bound on the average rating.
    pub min_average: f64,
    /// Score contribution for averages at or above the bound.
    pub score: i32,
}

/// Score awarded when at least `min_days` whole days have passed since the
/// item was last eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyBand {
    /// Inclusive lower bound on elapsed whole days.
    pub min_days: u32,
    /// Score contribution for gaps at or above the bound.
    pub score: i32,
}

/// Constants that shape the desirability score.
///
/// Bands are evaluated top to bottom and the first matching band wins, so
/// they must be listed with strictly descending bounds. Values that match no
/// band use the corresponding fallback.
///
/// # Examples
/// ```
/// use mealpick_scorer::ScoringPolicy;
///
/// let policy = ScoringPolicy::default();
/// assert_eq!(policy.decision_score(3, 0), 30);
/// assert_eq!(policy.recency_score(None), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Starting point every item receives before adjustments.
    pub base_score: i32,
    /// Lowest score an item can end up with.
    pub score_floor: i32,
    /// Contribution of each accept decision.
    pub accept_weight: i32,
    /// Contribution of each skip decision.
    pub skip_weight: i32,
    /// Symmetric bound on the combined decision contribution.
    pub decision_bound: i32,
    /// Rating bands, highest bound first.
    pub rating_bands: Vec<RatingBand>,
    /// Rating contribution below every band.
    pub rating_fallback: i32,
    /// Rating contribution for items that were never rated.
    pub unrated_score: i32,
    /// Recency bands, longest gap first.
    pub recency_bands: Vec<RecencyBand>,
    /// Recency contribution below every band.
    pub recency_fallback: i32,
    /// Recency contribution for items that were never eaten.
    pub never_eaten_score: i32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_score: 100,
            score_floor: 10,
            accept_weight: 10,
            skip_weight: -15,
            decision_bound: 100,
            rating_bands: vec![
                RatingBand {
                    min_average: 4.5,
                    score: 50,
                },
                RatingBand {
                    min_average: 4.0,
                    score: 30,
                },
                RatingBand {
                    min_average: 3.5,
                    score: 10,
                },
                RatingBand {
                    min_average: 3.0,
                    score: 0,
                },
                RatingBand {
                    min_average: 2.0,
                    score: -20,
                },
            ],
            rating_fallback: -50,
            unrated_score: 0,
            recency_bands: vec![
                RecencyBand {
                    min_days: 30,
                    score: 100,
                },
                RecencyBand {
                    min_days: 21,
                    score: 80,
                },
                RecencyBand {
                    min_days: 14,
                    score: 50,
                },
                RecencyBand {
                    min_days: 7,
                    score: 0,
                },
                RecencyBand {
                    min_days: 3,
                    score: -50,
                },
            ],
            recency_fallback: -100,
            never_eaten_score: 100,
        }
    }
}

// Narrow an `i64` to `i32`, pinning out-of-range values to the nearest bound.
fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl ScoringPolicy {
    /// Check the structural rules and return the policy unchanged when they
    /// hold.
    ///
    /// # Errors
    /// Returns [`ScorerError::InvalidPolicy`] when the decision bound or the
    /// accept weight is negative, when the skip weight is positive, when a
    /// band list is empty or not strictly descending, or when a rating bound
    /// is not finite.
    pub fn validate(self) -> Result<Self, ScorerError> {
        if self.decision_bound < 0 {
            return Err(ScorerError::invalid(format!(
                "decision bound {} must not be negative",
                self.decision_bound
            )));
        }
        if self.accept_weight < 0 {
            return Err(ScorerError::invalid(format!(
                "accept weight {} must not be negative",
                self.accept_weight
            )));
        }
        if self.skip_weight > 0 {
            return Err(ScorerError::invalid(format!(
                "skip weight {} must not be positive",
                self.skip_weight
            )));
        }
        if self.rating_bands.is_empty() {
            return Err(ScorerError::invalid("rating bands must not be empty"));
        }
        if let Some(band) = self
            .rating_bands
            .iter()
            .find(|band| !band.min_average.is_finite())
        {
            return Err(ScorerError::invalid(format!(
                "rating bound {} is not finite",
                band.min_average
            )));
        }
        if let Some(pair) = self
            .rating_bands
            .windows(2)
            .find(|pair| matches!(pair, [upper, lower] if upper.min_average <= lower.min_average))
        {
            return Err(ScorerError::invalid(format!(
                "rating bands must be strictly descending, found {pair:?}"
            )));
        }
        if self.recency_bands.is_empty() {
            return Err(ScorerError::invalid("recency bands must not be empty"));
        }
        if let Some(pair) = self
            .recency_bands
            .windows(2)
            .find(|pair| matches!(pair, [upper, lower] if upper.min_days <= lower.min_days))
        {
            return Err(ScorerError::invalid(format!(
                "recency bands must be strictly descending, found {pair:?}"
            )));
        }
        Ok(self)
    }

    /// Combined accept and skip contribution, clamped to
    /// `-decision_bound..=decision_bound`.
    #[must_use]
    pub fn decision_score(&self, accepts: u32, skips: u32) -> i32 {
        let bound = i64::from(self.decision_bound);
        let raw = i64::from(accepts)
            .saturating_mul(i64::from(self.accept_weight))
            .saturating_add(i64::from(skips).saturating_mul(i64::from(self.skip_weight)));
        saturate(raw.max(-bound).min(bound))
    }

    /// Contribution of the mean rating, or `unrated_score` without ratings.
    #[must_use]
    pub fn rating_score(&self, average: Option<f64>) -> i32 {
        average.map_or(self.unrated_score, |avg| {
            self.rating_bands
                .iter()
                .find(|band| avg >= band.min_average)
                .map_or(self.rating_fallback, |band| band.score)
        })
    }

    /// Contribution of the whole days since the item was last eaten, or
    /// `never_eaten_score` when it never was.
    #[must_use]
    pub fn recency_score(&self, days_since_eaten: Option<u32>) -> i32 {
        days_since_eaten.map_or(self.never_eaten_score, |days| {
            self.recency_bands
                .iter()
                .find(|band| days >= band.min_days)
                .map_or(self.recency_fallback, |band| band.score)
        })
    }

    /// Sum the components onto the base score and apply the floor.
    #[must_use]
    pub fn final_score(&self, decision: i32, rating: i32, recency: i32) -> i32 {
        let total = i64::from(self.base_score)
            + i64::from(decision)
            + i64::from(rating)
            + i64::from(recency);
        saturate(total.max(i64::from(self.score_floor)))
    }

    /// Compute every component from the raw interaction aggregates.
    #[must_use]
    pub fn breakdown(
        &self,
        accepts: u32,
        skips: u32,
        average_rating: Option<f64>,
        days_since_eaten: Option<u32>,
    ) -> ScoreBreakdown {
        let accept_skip_score = self.decision_score(accepts, skips);
        let rating_score = self.rating_score(average_rating);
        let recency_score = self.recency_score(days_since_eaten);
        ScoreBreakdown {
            accept_skip_score,
            rating_score,
            recency_score,
            final_score: self.final_score(accept_skip_score, rating_score, recency_score),
        }
    }
}
