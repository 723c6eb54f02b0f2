//! Decision recording.
//!
//! A skip erases the most recent accept of the same item before it is
//! stored, unless that accept is already linked to a review. Both steps run
//! inside one [`DecisionTransaction`], so either the retraction and the new
//! record are both visible or neither is.

use log::{info, warn};
use mealpick_core::{
    Clock, Decision, DecisionId, DecisionRecord, DecisionTransaction, FoodId, InteractionStore,
    ReviewId, StoreError, SystemClock,
};

use crate::RecommendError;

/// Writes accept and skip decisions to an [`InteractionStore`].
#[derive(Debug)]
pub struct HistoryLedger<I, K = SystemClock> {
    interactions: I,
    clock: K,
}

impl<I, K> HistoryLedger<I, K>
where
    I: InteractionStore,
    K: Clock,
{
    /// Build a ledger stamping decisions with `clock`.
    pub const fn new(interactions: I, clock: K) -> Self {
        Self {
            interactions,
            clock,
        }
    }

    /// Interaction store the ledger writes to.
    pub const fn interactions(&self) -> &I {
        &self.interactions
    }

    /// Record `decision` for `food_id` and return the new record's id.
    ///
    /// # Errors
    /// Returns [`RecommendError::PersistenceFailure`] when any step fails.
    /// The transaction is rolled back in that case.
    pub fn record_decision(
        &self,
        food_id: &FoodId,
        decision: Decision,
    ) -> Result<DecisionId, RecommendError> {
        let persistence = |source: StoreError| RecommendError::PersistenceFailure {
            food_id: food_id.clone(),
            source,
        };

        let mut txn = self.interactions.begin().map_err(persistence)?;
        if decision == Decision::Skip {
            retract_latest_accept(txn.as_mut(), food_id).map_err(persistence)?;
        }
        let record = txn
            .insert_decision(food_id, decision, self.clock.now())
            .map_err(persistence)?;
        txn.commit().map_err(persistence)?;

        info!("recorded {decision} for {food_id} as {}", record.id);
        Ok(record.id)
    }

    /// Link `review` to the decision `id`.
    ///
    /// Attaching the review already linked to the decision succeeds without
    /// changing anything.
    ///
    /// # Errors
    /// Returns [`RecommendError::UnknownDecision`] or
    /// [`RecommendError::ReviewConflict`] for rejected links and
    /// [`RecommendError::ReviewFailure`] when the store fails.
    pub fn attach_review(
        &self,
        id: &DecisionId,
        review: &ReviewId,
    ) -> Result<DecisionRecord, RecommendError> {
        self.interactions
            .attach_review(id, review)
            .map_err(|err| match err {
                StoreError::UnknownDecision { id: missing } => {
                    warn!("cannot link review {review}: decision {missing} does not exist");
                    RecommendError::UnknownDecision { id: missing }
                }
                StoreError::ReviewConflict {
                    id: target,
                    existing,
                } => {
                    warn!("cannot link review {review}: decision {target} already has {existing}");
                    RecommendError::ReviewConflict {
                        id: target,
                        existing,
                    }
                }
                other => RecommendError::ReviewFailure {
                    id: id.clone(),
                    source: other,
                },
            })
    }
}

// Delete the newest accept for `food_id` within `txn`. An accept already
// linked to a review is immutable and stays.
fn retract_latest_accept(
    txn: &mut (dyn DecisionTransaction + '_),
    food_id: &FoodId,
) -> Result<Option<DecisionRecord>, StoreError> {
    let Some(accept) = txn.latest_decision(food_id, Decision::Accept)? else {
        return Ok(None);
    };
    if let Some(review) = &accept.linked_review_id {
        info!(
            "skip of {food_id} keeps accept {} linked to review {review}",
            accept.id
        );
        return Ok(None);
    }
    txn.delete_decision(&accept.id)?;
    info!(
        "skip of {food_id} retracts accept {} from {}",
        accept.id, accept.created_at
    );
    Ok(Some(accept))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use mealpick_core::test_support::MemoryInteractionStore;
    use mealpick_core::{
        Decision, DecisionId, FixedClock, FoodId, InteractionStore, ManualClock, ReviewId,
        StoreError,
    };
    use rstest::{fixture, rstest};

    use super::{HistoryLedger, retract_latest_accept};
    use crate::RecommendError;

    #[fixture]
    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn accept_only_inserts(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        let ledger = HistoryLedger::new(&store, FixedClock::new(nine_am));
        let food = FoodId::new("F1");

        let first = ledger
            .record_decision(&food, Decision::Accept)
            .expect("first accept");
        let second = ledger
            .record_decision(&food, Decision::Accept)
            .expect("second accept");

        assert_ne!(first, second);
        assert_eq!(
            store
                .count_decisions(&food, Decision::Accept)
                .expect("count"),
            2
        );
    }

    #[rstest]
    fn skip_retracts_only_the_latest_accept(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        let clock = ManualClock::new(nine_am);
        let ledger = HistoryLedger::new(&store, &clock);
        let food = FoodId::new("F1");

        let older = ledger
            .record_decision(&food, Decision::Accept)
            .expect("older accept");
        clock.advance(TimeDelta::minutes(1));
        ledger
            .record_decision(&food, Decision::Accept)
            .expect("newer accept");
        clock.advance(TimeDelta::minutes(1));
        let skip = ledger
            .record_decision(&food, Decision::Skip)
            .expect("skip");

        let ids: Vec<DecisionId> = store
            .decisions_for(&food)
            .expect("decisions")
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec![older, skip]);
    }

    #[rstest]
    fn skip_leaves_other_foods_alone(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        let ledger = HistoryLedger::new(&store, FixedClock::new(nine_am));
        let ramen = FoodId::new("F1");
        let pizza = FoodId::new("F2");

        ledger
            .record_decision(&pizza, Decision::Accept)
            .expect("accept pizza");
        ledger
            .record_decision(&ramen, Decision::Skip)
            .expect("skip ramen");

        assert_eq!(
            store
                .count_decisions(&pizza, Decision::Accept)
                .expect("count"),
            1
        );
    }

    #[rstest]
    fn skip_keeps_a_reviewed_accept(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        let clock = ManualClock::new(nine_am);
        let ledger = HistoryLedger::new(&store, &clock);
        let food = FoodId::new("F1");

        let older = ledger
            .record_decision(&food, Decision::Accept)
            .expect("older accept");
        clock.advance(TimeDelta::minutes(1));
        let reviewed = ledger
            .record_decision(&food, Decision::Accept)
            .expect("reviewed accept");
        ledger
            .attach_review(&reviewed, &ReviewId::new("R1"))
            .expect("link review");
        clock.advance(TimeDelta::minutes(1));
        let skip = ledger
            .record_decision(&food, Decision::Skip)
            .expect("skip");

        let ids: Vec<DecisionId> = store
            .decisions_for(&food)
            .expect("decisions")
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec![older, reviewed, skip]);
    }

    #[rstest]
    fn retraction_without_accepts_is_a_no_op(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        let food = FoodId::new("F1");
        let mut txn = store.begin().expect("begin");
        txn.insert_decision(&food, Decision::Skip, nine_am)
            .expect("insert skip");

        let retracted = retract_latest_accept(txn.as_mut(), &food).expect("retract");

        assert!(retracted.is_none());
        txn.commit().expect("commit");
        assert_eq!(
            store.count_decisions(&food, Decision::Skip).expect("count"),
            1
        );
    }

    #[rstest]
    fn failed_commit_leaves_history_untouched(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        let ledger = HistoryLedger::new(&store, FixedClock::new(nine_am));
        let food = FoodId::new("F1");
        ledger
            .record_decision(&food, Decision::Accept)
            .expect("accept");

        store.fail_commits(true);
        let err = ledger
            .record_decision(&food, Decision::Skip)
            .expect_err("commit fails");

        assert!(matches!(
            err,
            RecommendError::PersistenceFailure { ref food_id, .. } if *food_id == food
        ));
        store.fail_commits(false);
        assert_eq!(
            store
                .count_decisions(&food, Decision::Accept)
                .expect("count"),
            1
        );
        assert_eq!(
            store.count_decisions(&food, Decision::Skip).expect("count"),
            0
        );
    }

    #[rstest]
    fn unavailable_store_is_a_persistence_failure(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        store.fail_reads(true);
        let ledger = HistoryLedger::new(&store, FixedClock::new(nine_am));

        let err = ledger
            .record_decision(&FoodId::new("F1"), Decision::Accept)
            .expect_err("store offline");

        assert!(matches!(
            err,
            RecommendError::PersistenceFailure {
                source: StoreError::Unavailable { .. },
                ..
            }
        ));
    }

    #[rstest]
    fn attach_review_maps_store_outcomes(nine_am: DateTime<Utc>) {
        let store = MemoryInteractionStore::default();
        let ledger = HistoryLedger::new(&store, FixedClock::new(nine_am));
        let decision = ledger
            .record_decision(&FoodId::new("F1"), Decision::Accept)
            .expect("accept");
        let review = ReviewId::new("R1");

        let linked = ledger
            .attach_review(&decision, &review)
            .expect("first link");
        assert_eq!(linked.linked_review_id, Some(review.clone()));
        ledger
            .attach_review(&decision, &review)
            .expect("repeat link is a no-op");

        let conflict = ledger
            .attach_review(&decision, &ReviewId::new("R2"))
            .expect_err("conflicting review");
        assert!(matches!(
            conflict,
            RecommendError::ReviewConflict { ref existing, .. } if *existing == review
        ));

        let missing = ledger
            .attach_review(&DecisionId::new("nope"), &review)
            .expect_err("unknown decision");
        assert!(matches!(missing, RecommendError::UnknownDecision { .. }));

        store.fail_reads(true);
        let offline = ledger
            .attach_review(&decision, &review)
            .expect_err("store offline");
        assert!(matches!(offline, RecommendError::ReviewFailure { .. }));
    }
}
