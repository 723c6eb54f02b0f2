#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! End-to-end runs of the engine over the SQLite store.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mealpick_core::{
    ConsumptionRecord, Cuisine, Decision, FoodItem, InteractionStore, ManualClock, ReviewId,
    SqliteStore, seed_catalog,
};
use mealpick_recommender::{HistoryLedger, RecommendError, Recommender};
use mealpick_scorer::HistoryScorer;
use rstest::{fixture, rstest};

type Engine<'a> = Recommender<
    &'a SqliteStore,
    HistoryScorer<&'a SqliteStore, &'a ManualClock>,
    &'a SqliteStore,
    &'a ManualClock,
>;

#[fixture]
fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("open store")
}

fn engine<'a>(store: &'a SqliteStore, clock: &'a ManualClock) -> Engine<'a> {
    Recommender::seeded(
        store,
        HistoryScorer::new(store, clock),
        HistoryLedger::new(store, clock),
        99,
    )
}

fn ramen_and_pizza(store: &SqliteStore) -> (FoodItem, FoodItem) {
    let items = seed_catalog(
        store,
        &[(Cuisine::Japanese, "Ramen"), (Cuisine::Western, "Pizza")],
    )
    .expect("seed catalog");
    let mut iter = items.into_iter();
    (
        iter.next().expect("ramen"),
        iter.next().expect("pizza"),
    )
}

#[rstest]
fn accepts_shift_the_ramen_pizza_balance(store: SqliteStore, nine_am: DateTime<Utc>) {
    let clock = ManualClock::new(nine_am);
    let subject = engine(&store, &clock);
    let (ramen, pizza) = ramen_and_pizza(&store);

    assert_eq!(subject.explain(&ramen).expect("explain").final_score, 200);
    assert_eq!(subject.explain(&pizza).expect("explain").final_score, 200);

    for _ in 0..3 {
        subject
            .record_decision(&ramen, Decision::Accept)
            .expect("accept ramen");
    }

    let breakdown = subject.explain(&ramen).expect("explain");
    assert_eq!(breakdown.accept_skip_score, 30);
    assert_eq!(breakdown.final_score, 230);
    assert_eq!(subject.explain(&pizza).expect("explain").final_score, 200);
}

#[rstest]
fn skip_five_minutes_after_accept_leaves_one_skip(store: SqliteStore, nine_am: DateTime<Utc>) {
    let clock = ManualClock::new(nine_am);
    let subject = engine(&store, &clock);
    let (ramen, _) = ramen_and_pizza(&store);

    subject
        .record_decision(&ramen, Decision::Accept)
        .expect("accept at 09:00");
    clock.advance(TimeDelta::minutes(5));
    subject
        .record_decision(&ramen, Decision::Skip)
        .expect("skip at 09:05");

    assert_eq!(
        store
            .count_decisions(&ramen.id, Decision::Accept)
            .expect("count accepts"),
        0
    );
    assert_eq!(
        store
            .count_decisions(&ramen.id, Decision::Skip)
            .expect("count skips"),
        1
    );
}

#[rstest]
fn reviews_feed_rating_and_recency(store: SqliteStore, nine_am: DateTime<Utc>) {
    let clock = ManualClock::new(nine_am);
    let subject = engine(&store, &clock);
    let (ramen, _) = ramen_and_pizza(&store);

    let decision = subject
        .record_decision(&ramen, Decision::Accept)
        .expect("accept");
    store
        .record_consumption(&ConsumptionRecord {
            food_id: ramen.id.clone(),
            rating: 4.5,
            ate_at: nine_am,
        })
        .expect("record consumption");
    let review = ReviewId::new("R1");
    subject
        .attach_review(&decision, &review)
        .expect("link review");

    clock.advance(TimeDelta::days(15));
    let breakdown = subject.explain(&ramen).expect("explain");
    assert_eq!(breakdown.accept_skip_score, 10);
    assert_eq!(breakdown.rating_score, 50);
    assert_eq!(breakdown.recency_score, 50);
    assert_eq!(breakdown.final_score, 210);

    let conflict = subject
        .attach_review(&decision, &ReviewId::new("R2"))
        .expect_err("second review");
    assert!(matches!(conflict, RecommendError::ReviewConflict { .. }));
}

#[rstest]
fn recommends_from_the_seeded_catalog(store: SqliteStore, nine_am: DateTime<Utc>) {
    let clock = ManualClock::new(nine_am);
    let subject = engine(&store, &clock);
    assert!(subject.recommend().expect("recommend").is_none());

    let (ramen, pizza) = ramen_and_pizza(&store);
    let picked = subject
        .recommend()
        .expect("recommend")
        .expect("catalog has items");
    assert!(picked == ramen || picked == pizza);
}
