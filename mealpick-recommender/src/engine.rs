//! The recommendation facade.

use std::sync::{Mutex, PoisonError};

use log::debug;
use mealpick_core::{
    CatalogStore, Clock, Decision, DecisionId, DecisionRecord, FoodId, FoodItem,
    InteractionStore, ReviewId, ScoreBreakdown, Scorer, StoreError, SystemClock,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{HistoryLedger, RecommendError, select};

/// Recommends one catalog item per call and records the user's response.
///
/// The engine holds no state between calls apart from its random source:
/// every recommendation reads the whole catalog and scores each item afresh.
///
/// # Examples
/// ```
/// use mealpick_core::test_support::{MemoryCatalog, MemoryInteractionStore};
/// use mealpick_core::{Cuisine, FoodId, FoodItem, SystemClock};
/// use mealpick_recommender::{HistoryLedger, Recommender};
/// use mealpick_scorer::HistoryScorer;
///
/// let ramen = FoodItem::new(FoodId::new("F1"), Cuisine::Japanese, "Ramen");
/// let catalog = MemoryCatalog::with_items([ramen.clone()]);
/// let history = MemoryInteractionStore::default();
/// let engine = Recommender::seeded(
///     catalog,
///     HistoryScorer::new(&history, SystemClock),
///     HistoryLedger::new(&history, SystemClock),
///     7,
/// );
/// assert_eq!(engine.recommend().unwrap(), Some(ramen));
/// ```
#[derive(Debug)]
pub struct Recommender<C, S, I, K = SystemClock, R = ChaCha8Rng> {
    catalog: C,
    scorer: S,
    ledger: HistoryLedger<I, K>,
    rng: Mutex<R>,
}

impl<C, S, I, K, R> Recommender<C, S, I, K, R>
where
    C: CatalogStore,
    S: Scorer,
    I: InteractionStore,
    K: Clock,
    R: Rng,
{
    /// Assemble an engine drawing from `rng`.
    pub const fn new(catalog: C, scorer: S, ledger: HistoryLedger<I, K>, rng: R) -> Self {
        Self {
            catalog,
            scorer,
            ledger,
            rng: Mutex::new(rng),
        }
    }

    /// Ledger used for decisions.
    pub const fn ledger(&self) -> &HistoryLedger<I, K> {
        &self.ledger
    }

    /// Pick one item from the catalog, weighted by score.
    ///
    /// Returns `Ok(None)` when the catalog is empty.
    ///
    /// # Errors
    /// Returns [`RecommendError::StoreUnavailable`] when the catalog or any
    /// item's history cannot be read. No partial ranking is used.
    pub fn recommend(&self) -> Result<Option<FoodItem>, RecommendError> {
        let items = self
            .catalog
            .list_all_items()
            .map_err(RecommendError::unavailable("list catalog items"))?;
        if items.is_empty() {
            debug!("catalog is empty; nothing to recommend");
            return Ok(None);
        }

        let scored = items
            .into_iter()
            .map(|item| {
                let score = self.scorer.score(&item)?;
                Ok((item, score))
            })
            .collect::<Result<Vec<_>, StoreError>>()
            .map_err(RecommendError::unavailable("score catalog items"))?;

        // The generator stays usable after a poisoned draw.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let picked = select(&scored, &mut *rng).cloned();
        if let Some(item) = &picked {
            debug!(
                "recommending {} ({}) from {} candidates",
                item.category,
                item.id,
                scored.len()
            );
        }
        Ok(picked)
    }

    /// Record the user's response to `item`.
    ///
    /// # Errors
    /// Returns [`RecommendError::PersistenceFailure`] when the decision could
    /// not be stored.
    pub fn record_decision(
        &self,
        item: &FoodItem,
        decision: Decision,
    ) -> Result<DecisionId, RecommendError> {
        self.ledger.record_decision(&item.id, decision)
    }

    /// Score components for `item`, without side effects.
    ///
    /// # Errors
    /// Returns [`RecommendError::StoreUnavailable`] when the history cannot
    /// be read.
    pub fn explain(&self, item: &FoodItem) -> Result<ScoreBreakdown, RecommendError> {
        self.scorer
            .explain(item)
            .map_err(RecommendError::unavailable("explain item score"))
    }

    /// Look up a catalog item by id.
    ///
    /// # Errors
    /// Returns [`RecommendError::StoreUnavailable`] when the catalog cannot
    /// be read.
    pub fn item(&self, id: &FoodId) -> Result<Option<FoodItem>, RecommendError> {
        self.catalog
            .get_item(id)
            .map_err(RecommendError::unavailable("read catalog item"))
    }

    /// Link a completed review to a recorded decision.
    ///
    /// # Errors
    /// See [`HistoryLedger::attach_review`].
    pub fn attach_review(
        &self,
        id: &DecisionId,
        review: &ReviewId,
    ) -> Result<DecisionRecord, RecommendError> {
        self.ledger.attach_review(id, review)
    }
}

impl<C, S, I, K> Recommender<C, S, I, K, ChaCha8Rng>
where
    C: CatalogStore,
    S: Scorer,
    I: InteractionStore,
    K: Clock,
{
    /// Assemble an engine whose draws are reproducible from `seed`.
    pub fn seeded(catalog: C, scorer: S, ledger: HistoryLedger<I, K>, seed: u64) -> Self {
        Self::new(catalog, scorer, ledger, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Assemble an engine seeded from operating-system entropy.
    pub fn from_entropy(catalog: C, scorer: S, ledger: HistoryLedger<I, K>) -> Self {
        Self::new(catalog, scorer, ledger, ChaCha8Rng::from_entropy())
    }
}
