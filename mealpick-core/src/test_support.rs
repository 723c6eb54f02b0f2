//! In-memory `CatalogStore` and `InteractionStore` implementations used by
//! unit and behaviour tests.

use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Utc};

use crate::{
    CatalogStore, ConsumptionRecord, Cuisine, Decision, DecisionId, DecisionRecord,
    DecisionTransaction, FoodId, FoodItem, InteractionStore, ReviewId, StoreError,
};

/// In-memory catalog.
///
/// Items keep their insertion order. The store performs linear scans and is
/// intended only for small datasets.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    items: Mutex<Vec<FoodItem>>,
    unavailable: AtomicBool,
}

impl MemoryCatalog {
    /// Create a catalog holding `items`.
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = FoodItem>,
    {
        Self {
            items: Mutex::new(items.into_iter().collect()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        self.unavailable.store(fail, Ordering::SeqCst);
    }

    fn items(&self, operation: &'static str) -> Result<MutexGuard<'_, Vec<FoodItem>>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(operation, "catalog offline"));
        }
        self.items
            .lock()
            .map_err(|_| StoreError::unavailable(operation, "catalog mutex poisoned"))
    }
}

impl CatalogStore for MemoryCatalog {
    fn list_all_items(&self) -> Result<Vec<FoodItem>, StoreError> {
        Ok(self.items("list catalog items")?.clone())
    }

    fn get_or_create(&self, cuisine: Cuisine, category: &str) -> Result<FoodItem, StoreError> {
        let mut items = self.items("get or create catalog item")?;
        if let Some(existing) = items.iter().find(|item| item.category == category) {
            return Ok(existing.clone());
        }
        let item = FoodItem::new(FoodId::generate(), cuisine, category);
        items.push(item.clone());
        Ok(item)
    }

    fn get_item(&self, id: &FoodId) -> Result<Option<FoodItem>, StoreError> {
        Ok(self
            .items("read catalog item")?
            .iter()
            .find(|item| item.id == *id)
            .cloned())
    }
}

#[derive(Debug, Default, Clone)]
struct InteractionState {
    decisions: Vec<DecisionRecord>,
    consumptions: Vec<ConsumptionRecord>,
}

impl InteractionState {
    // Later entries win ties on `created_at`, matching insertion order.
    fn latest(&self, food_id: &FoodId, decision: Decision) -> Option<&DecisionRecord> {
        self.decisions
            .iter()
            .filter(|record| record.food_id == *food_id && record.decision == decision)
            .fold(None, |latest: Option<&DecisionRecord>, record| match latest {
                Some(current) if current.created_at > record.created_at => Some(current),
                _ => Some(record),
            })
    }
}

/// In-memory interaction store with fault injection.
///
/// Transactions lock the whole store and work on a staged copy of its state,
/// which replaces the live state on commit.
#[derive(Debug, Default)]
pub struct MemoryInteractionStore {
    state: Mutex<InteractionState>,
    fail_reads: AtomicBool,
    fail_commits: AtomicBool,
}

impl MemoryInteractionStore {
    /// Append a consumption record.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when reads are failing.
    pub fn record_consumption(&self, record: ConsumptionRecord) -> Result<(), StoreError> {
        self.state("record consumption")?.consumptions.push(record);
        Ok(())
    }

    /// Make every subsequent read fail with [`StoreError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent commit fail with [`StoreError::Persistence`].
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    fn state(
        &self,
        operation: &'static str,
    ) -> Result<MutexGuard<'_, InteractionState>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(operation, "interaction store offline"));
        }
        self.state
            .lock()
            .map_err(|_| StoreError::unavailable(operation, "interaction mutex poisoned"))
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "averaging ratings divides a float sum by the record count"
)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

impl InteractionStore for MemoryInteractionStore {
    fn count_decisions(&self, food_id: &FoodId, decision: Decision) -> Result<u32, StoreError> {
        let state = self.state("count decisions")?;
        let count = state
            .decisions
            .iter()
            .filter(|record| record.food_id == *food_id && record.decision == decision)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    fn latest_decision(
        &self,
        food_id: &FoodId,
        decision: Decision,
    ) -> Result<Option<DecisionRecord>, StoreError> {
        Ok(self
            .state("read latest decision")?
            .latest(food_id, decision)
            .cloned())
    }

    fn decisions_for(&self, food_id: &FoodId) -> Result<Vec<DecisionRecord>, StoreError> {
        let state = self.state("list decisions")?;
        let mut records: Vec<_> = state
            .decisions
            .iter()
            .filter(|record| record.food_id == *food_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    fn average_rating(&self, food_id: &FoodId) -> Result<Option<f64>, StoreError> {
        let state = self.state("average ratings")?;
        let ratings: Vec<f64> = state
            .consumptions
            .iter()
            .filter(|record| record.food_id == *food_id)
            .map(|record| record.rating)
            .collect();
        Ok(mean(&ratings))
    }

    fn most_recent_consumption(
        &self,
        food_id: &FoodId,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let state = self.state("read most recent consumption")?;
        Ok(state
            .consumptions
            .iter()
            .filter(|record| record.food_id == *food_id)
            .map(|record| record.ate_at)
            .max())
    }

    fn attach_review(
        &self,
        id: &DecisionId,
        review: &ReviewId,
    ) -> Result<DecisionRecord, StoreError> {
        let mut state = self.state("attach review")?;
        let record = state
            .decisions
            .iter_mut()
            .find(|record| record.id == *id)
            .ok_or_else(|| StoreError::UnknownDecision { id: id.clone() })?;
        match record.linked_review_id.clone() {
            Some(existing) if existing != *review => {
                return Err(StoreError::ReviewConflict {
                    id: id.clone(),
                    existing,
                });
            }
            Some(_) => {}
            None => record.linked_review_id = Some(review.clone()),
        }
        Ok(record.clone())
    }

    fn begin(&self) -> Result<Box<dyn DecisionTransaction + '_>, StoreError> {
        let live = self.state("begin decision transaction")?;
        let staged = live.clone();
        Ok(Box::new(MemoryTransaction {
            live,
            staged,
            fail_commit: self.fail_commits.load(Ordering::SeqCst),
        }))
    }
}

struct MemoryTransaction<'store> {
    live: MutexGuard<'store, InteractionState>,
    staged: InteractionState,
    fail_commit: bool,
}

impl DecisionTransaction for MemoryTransaction<'_> {
    fn latest_decision(
        &mut self,
        food_id: &FoodId,
        decision: Decision,
    ) -> Result<Option<DecisionRecord>, StoreError> {
        Ok(self.staged.latest(food_id, decision).cloned())
    }

    fn insert_decision(
        &mut self,
        food_id: &FoodId,
        decision: Decision,
        created_at: DateTime<Utc>,
    ) -> Result<DecisionRecord, StoreError> {
        let record = DecisionRecord {
            id: DecisionId::generate(),
            food_id: food_id.clone(),
            decision,
            created_at,
            linked_review_id: None,
        };
        self.staged.decisions.push(record.clone());
        Ok(record)
    }

    fn delete_decision(&mut self, id: &DecisionId) -> Result<(), StoreError> {
        let before = self.staged.decisions.len();
        self.staged.decisions.retain(|record| record.id != *id);
        if self.staged.decisions.len() == before {
            return Err(StoreError::UnknownDecision { id: id.clone() });
        }
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        if self.fail_commit {
            return Err(StoreError::persistence(
                "commit decision transaction",
                "simulated commit failure",
            ));
        }
        *self.live = std::mem::take(&mut self.staged);
        Ok(())
    }
}
