//! Request-time scoring against the interaction store.

use log::debug;
use mealpick_core::{
    Clock, Decision, FoodItem, InteractionStore, ScoreBreakdown, Scorer, StoreError, SystemClock,
    whole_days_between,
};

use crate::{ScorerError, ScoringPolicy};

/// Scores items from their accept/skip counts, mean rating and the time
/// since they were last eaten.
///
/// Every call reads the store afresh; nothing is cached between calls.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use mealpick_core::test_support::MemoryInteractionStore;
/// use mealpick_core::{Cuisine, FixedClock, FoodId, FoodItem, Scorer};
/// use mealpick_scorer::HistoryScorer;
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
/// let scorer = HistoryScorer::new(MemoryInteractionStore::default(), FixedClock::new(now));
/// let item = FoodItem::new(FoodId::new("F1"), Cuisine::Japanese, "Ramen");
/// assert_eq!(scorer.score(&item).unwrap(), 200);
/// ```
#[derive(Debug)]
pub struct HistoryScorer<I, K = SystemClock> {
    interactions: I,
    clock: K,
    policy: ScoringPolicy,
}

impl<I, K> HistoryScorer<I, K>
where
    I: InteractionStore,
    K: Clock,
{
    /// Build a scorer using [`ScoringPolicy::default`].
    pub fn new(interactions: I, clock: K) -> Self {
        Self {
            interactions,
            clock,
            policy: ScoringPolicy::default(),
        }
    }

    /// Build a scorer with a custom policy.
    ///
    /// # Errors
    /// Returns [`ScorerError::InvalidPolicy`] when `policy` fails
    /// [`ScoringPolicy::validate`].
    pub fn with_policy(
        interactions: I,
        clock: K,
        policy: ScoringPolicy,
    ) -> Result<Self, ScorerError> {
        Ok(Self {
            interactions,
            clock,
            policy: policy.validate()?,
        })
    }

    /// Policy in effect.
    pub const fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Interaction store the scorer reads from.
    pub const fn interactions(&self) -> &I {
        &self.interactions
    }
}

impl<I, K> Scorer for HistoryScorer<I, K>
where
    I: InteractionStore,
    K: Clock,
{
    fn explain(&self, item: &FoodItem) -> Result<ScoreBreakdown, StoreError> {
        let accepts = self.interactions.count_decisions(&item.id, Decision::Accept)?;
        let skips = self.interactions.count_decisions(&item.id, Decision::Skip)?;
        let average = self.interactions.average_rating(&item.id)?;
        let last_eaten = self.interactions.most_recent_consumption(&item.id)?;
        let now = self.clock.now();
        let days = last_eaten.map(|eaten| whole_days_between(eaten, now));

        let breakdown = self.policy.breakdown(accepts, skips, average, days);
        debug!(
            "scored {} ({}): accepts={accepts} skips={skips} average={average:?} days={days:?} -> {breakdown:?}",
            item.category, item.id
        );
        Ok(breakdown)
    }
}
