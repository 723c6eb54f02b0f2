#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for history-based scoring.

use std::cell::RefCell;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mealpick_core::test_support::MemoryInteractionStore;
use mealpick_core::{
    ConsumptionRecord, Cuisine, Decision, DecisionTransaction, FixedClock, FoodId, FoodItem,
    InteractionStore, ScoreBreakdown, Scorer,
};
use mealpick_scorer::HistoryScorer;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Shared state for the scoring scenarios.
pub struct TestContext {
    store: MemoryInteractionStore,
    now: DateTime<Utc>,
    item: RefCell<Option<FoodItem>>,
    breakdown: RefCell<Option<ScoreBreakdown>>,
}

impl TestContext {
    fn item(&self) -> FoodItem {
        self.item.borrow().clone().expect("food item set up")
    }

    fn breakdown(&self) -> ScoreBreakdown {
        self.breakdown.borrow().expect("score explained")
    }

    fn record(&self, decision: Decision, count: u32) {
        let item = self.item();
        for _ in 0..count {
            let mut txn = self.store.begin().expect("begin transaction");
            txn.insert_decision(&item.id, decision, self.now)
                .expect("insert decision");
            txn.commit().expect("commit decision");
        }
    }
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        store: MemoryInteractionStore::default(),
        now: Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
        item: RefCell::new(None),
        breakdown: RefCell::new(None),
    }
}

#[given("a food item {name}")]
fn food_item(context: &TestContext, name: String) {
    let category = name.trim_matches('"');
    *context.item.borrow_mut() = Some(FoodItem::new(
        FoodId::new("F1"),
        Cuisine::Japanese,
        category,
    ));
}

#[given("the item was accepted {count} times")]
fn accepted(context: &TestContext, count: u32) {
    context.record(Decision::Accept, count);
}

#[given("the item was skipped {count} times")]
fn skipped(context: &TestContext, count: u32) {
    context.record(Decision::Skip, count);
}

#[given("the item was eaten {days} days ago with rating {rating}")]
fn eaten(context: &TestContext, days: i64, rating: f64) {
    context
        .store
        .record_consumption(ConsumptionRecord {
            food_id: context.item().id,
            rating,
            ate_at: context.now - TimeDelta::days(days),
        })
        .expect("record consumption");
}

#[when("I explain the item's score")]
fn explain(context: &TestContext) {
    let scorer = HistoryScorer::new(&context.store, FixedClock::new(context.now));
    let breakdown = scorer.explain(&context.item()).expect("explain score");
    *context.breakdown.borrow_mut() = Some(breakdown);
}

#[then("the accept and skip score is {expected}")]
fn accept_skip_score(context: &TestContext, expected: i32) {
    assert_eq!(context.breakdown().accept_skip_score, expected);
}

#[then("the rating score is {expected}")]
fn rating_score(context: &TestContext, expected: i32) {
    assert_eq!(context.breakdown().rating_score, expected);
}

#[then("the recency score is {expected}")]
fn recency_score(context: &TestContext, expected: i32) {
    assert_eq!(context.breakdown().recency_score, expected);
}

#[then("the final score is {expected}")]
fn final_score(context: &TestContext, expected: i32) {
    assert_eq!(context.breakdown().final_score, expected);
}

#[scenario(path = "tests/features/history_scoring.feature", index = 0)]
fn never_eaten_item(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/history_scoring.feature", index = 1)]
fn accepted_item(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/history_scoring.feature", index = 2)]
fn skip_clamp(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/history_scoring.feature", index = 3)]
fn score_floor(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/history_scoring.feature", index = 4)]
fn averaged_ratings(context: TestContext) {
    let _ = context;
}
