//! Score food items from a user's interaction history.
//!
//! The `Scorer` trait turns a [`FoodItem`](crate::FoodItem) into a
//! [`ScoreBreakdown`]: the integer desirability used for weighted selection
//! together with the components it was summed from.

use crate::{FoodItem, StoreError};

/// Decomposition of one item's score.
///
/// `final_score` is the floored sum of a fixed base and the three
/// components; keeping the parts lets callers explain a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    /// Contribution of accept and skip decisions.
    pub accept_skip_score: i32,
    /// Contribution of the average review rating.
    pub rating_score: i32,
    /// Contribution of the time since the item was last eaten.
    pub recency_score: i32,
    /// Floored total used as the selection weight.
    pub final_score: i32,
}

/// Calculate a desirability score for a food item.
///
/// Higher scores make an item more likely to be recommended. Implementations
/// must be thread-safe (`Send` + `Sync`) so one scorer can serve concurrent
/// recommendations. Store failures are returned rather than replaced by a
/// neutral score, which would silently bias the pick.
///
/// # Examples
///
/// ```rust
/// use mealpick_core::{Cuisine, FoodId, FoodItem, ScoreBreakdown, Scorer, StoreError};
///
/// struct FlatScorer;
///
/// impl Scorer for FlatScorer {
///     fn explain(&self, _item: &FoodItem) -> Result<ScoreBreakdown, StoreError> {
///         Ok(ScoreBreakdown {
///             accept_skip_score: 0,
///             rating_score: 0,
///             recency_score: 0,
///             final_score: 100,
///         })
///     }
/// }
///
/// let item = FoodItem::new(FoodId::new("F1"), Cuisine::Korean, "Bibimbap");
/// assert_eq!(FlatScorer.score(&item).unwrap(), 100);
/// ```
pub trait Scorer: Send + Sync {
    /// Return the full breakdown for `item`.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the interaction history cannot be read.
    fn explain(&self, item: &FoodItem) -> Result<ScoreBreakdown, StoreError>;

    /// Return only the final score for `item`.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the interaction history cannot be read.
    fn score(&self, item: &FoodItem) -> Result<i32, StoreError> {
        self.explain(item).map(|breakdown| breakdown.final_score)
    }
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn explain(&self, item: &FoodItem) -> Result<ScoreBreakdown, StoreError> {
        (**self).explain(item)
    }
}
