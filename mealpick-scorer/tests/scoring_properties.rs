//! Property-based tests for the scoring policy.
//!
//! # Invariants tested
//!
//! - **Floor:** the final score never drops below the policy floor.
//! - **Never eaten:** items without consumption records get the full
//!   recency bonus.
//! - **Monotonicity:** more accepts never lower the score and more skips
//!   never raise it.
//! - **Bounded decisions:** the accept/skip contribution stays within the
//!   decision bound.

use mealpick_scorer::ScoringPolicy;
use proptest::prelude::*;

#[expect(
    clippy::float_arithmetic,
    reason = "ratings are generated on a half-point scale"
)]
fn rating_strategy() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((0_u8..=10).prop_map(|halves| f64::from(halves) / 2.0))
}

fn days_strategy() -> impl Strategy<Value = Option<u32>> {
    prop::option::of(0_u32..400)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn final_score_respects_floor(
        accepts in 0_u32..1_000,
        skips in 0_u32..1_000,
        rating in rating_strategy(),
        days in days_strategy(),
    ) {
        let policy = ScoringPolicy::default();
        let breakdown = policy.breakdown(accepts, skips, rating, days);
        prop_assert!(breakdown.final_score >= policy.score_floor);
    }

    #[test]
    fn never_eaten_items_get_full_recency_bonus(
        accepts in 0_u32..1_000,
        skips in 0_u32..1_000,
        rating in rating_strategy(),
    ) {
        let breakdown = ScoringPolicy::default().breakdown(accepts, skips, rating, None);
        prop_assert_eq!(breakdown.recency_score, 100);
    }

    #[test]
    fn accepts_never_lower_the_score(
        accepts in 0_u32..1_000,
        extra in 1_u32..50,
        skips in 0_u32..1_000,
        rating in rating_strategy(),
        days in days_strategy(),
    ) {
        let policy = ScoringPolicy::default();
        let before = policy.breakdown(accepts, skips, rating, days);
        let after = policy.breakdown(accepts + extra, skips, rating, days);
        prop_assert!(after.final_score >= before.final_score);
    }

    #[test]
    fn skips_never_raise_the_score(
        accepts in 0_u32..1_000,
        skips in 0_u32..1_000,
        extra in 1_u32..50,
        rating in rating_strategy(),
        days in days_strategy(),
    ) {
        let policy = ScoringPolicy::default();
        let before = policy.breakdown(accepts, skips, rating, days);
        let after = policy.breakdown(accepts, skips + extra, rating, days);
        prop_assert!(after.final_score <= before.final_score);
    }

    #[test]
    fn decision_score_stays_within_bound(
        accepts in any::<u32>(),
        skips in any::<u32>(),
    ) {
        let policy = ScoringPolicy::default();
        let score = policy.decision_score(accepts, skips);
        prop_assert!(score.abs() <= policy.decision_bound);
    }
}
