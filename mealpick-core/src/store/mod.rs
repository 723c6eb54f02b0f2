//! Data access traits for the catalog and the user's interaction history.
//!
//! The engine reads catalog entries through [`CatalogStore`] and interaction
//! aggregates through [`InteractionStore`]. Decisions are written through a
//! [`DecisionTransaction`] so the "skip retracts the latest accept"
//! correction happens as one atomic unit.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{Cuisine, Decision, DecisionId, DecisionRecord, FoodId, FoodItem, ReviewId};

mod error;
#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use error::{BoxedSource, StoreError};
#[cfg(feature = "store-sqlite")]
pub use schema::{SCHEMA_VERSION, SchemaError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteStore, SqliteStoreError};

/// Access to the food catalog.
///
/// Items are never deleted. [`CatalogStore::get_or_create`] is idempotent by
/// category name: asking twice for the same category yields the same
/// [`FoodId`].
pub trait CatalogStore: Send + Sync {
    /// Return every catalog entry.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the catalog cannot be read.
    fn list_all_items(&self) -> Result<Vec<FoodItem>, StoreError>;

    /// Return the entry for `category`, creating it under `cuisine` if absent.
    ///
    /// An existing entry keeps its original cuisine.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the lookup or insert fails.
    fn get_or_create(&self, cuisine: Cuisine, category: &str) -> Result<FoodItem, StoreError>;

    /// Look up a single entry by identifier.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the catalog cannot be read.
    fn get_item(&self, id: &FoodId) -> Result<Option<FoodItem>, StoreError>;
}

/// Read and write access to decisions and consumption history.
///
/// Reads run with read-committed visibility: a decision committed by another
/// caller may or may not be observed by a concurrent read.
pub trait InteractionStore: Send + Sync {
    /// Count decisions of kind `decision` recorded for `food_id`.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the store cannot be read.
    fn count_decisions(&self, food_id: &FoodId, decision: Decision) -> Result<u32, StoreError>;

    /// Return the most recent decision of kind `decision` for `food_id`.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the store cannot be read.
    fn latest_decision(
        &self,
        food_id: &FoodId,
        decision: Decision,
    ) -> Result<Option<DecisionRecord>, StoreError>;

    /// Return every decision for `food_id`, oldest first.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the store cannot be read.
    fn decisions_for(&self, food_id: &FoodId) -> Result<Vec<DecisionRecord>, StoreError>;

    /// Mean rating across all consumption records for `food_id`.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the store cannot be read.
    fn average_rating(&self, food_id: &FoodId) -> Result<Option<f64>, StoreError>;

    /// Most recent `ate_at` across all consumption records for `food_id`.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when the store cannot be read.
    fn most_recent_consumption(
        &self,
        food_id: &FoodId,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Link a completed review to a decision.
    ///
    /// Linking the same review twice is a no-op.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownDecision`] for a missing decision and
    /// [`StoreError::ReviewConflict`] when a different review is already
    /// linked.
    fn attach_review(
        &self,
        id: &DecisionId,
        review: &ReviewId,
    ) -> Result<DecisionRecord, StoreError>;

    /// Open a write transaction for recording one decision.
    ///
    /// Transactions on the same store are serialized. Dropping the
    /// transaction without calling [`DecisionTransaction::commit`] discards
    /// every change made through it.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the transaction cannot be started.
    fn begin(&self) -> Result<Box<dyn DecisionTransaction + '_>, StoreError>;
}

/// Writes that participate in one decision transaction.
pub trait DecisionTransaction {
    /// Return the most recent decision of kind `decision` for `food_id`, as
    /// seen inside the transaction.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the lookup fails.
    fn latest_decision(
        &mut self,
        food_id: &FoodId,
        decision: Decision,
    ) -> Result<Option<DecisionRecord>, StoreError>;

    /// Insert a new decision record.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the insert fails.
    fn insert_decision(
        &mut self,
        food_id: &FoodId,
        decision: Decision,
        created_at: DateTime<Utc>,
    ) -> Result<DecisionRecord, StoreError>;

    /// Delete a decision record.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownDecision`] when no such record exists.
    fn delete_decision(&mut self, id: &DecisionId) -> Result<(), StoreError>;

    /// Publish every change made through this transaction.
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] when the commit fails; nothing is
    /// published in that case.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

macro_rules! forward_catalog_store {
    ($($wrapper:ty),+) => {$(
        impl<C: CatalogStore + ?Sized> CatalogStore for $wrapper {
            fn list_all_items(&self) -> Result<Vec<FoodItem>, StoreError> {
                (**self).list_all_items()
            }

            fn get_or_create(
                &self,
                cuisine: Cuisine,
                category: &str,
            ) -> Result<FoodItem, StoreError> {
                (**self).get_or_create(cuisine, category)
            }

            fn get_item(&self, id: &FoodId) -> Result<Option<FoodItem>, StoreError> {
                (**self).get_item(id)
            }
        }
    )+};
}

macro_rules! forward_interaction_store {
    ($($wrapper:ty),+) => {$(
        impl<I: InteractionStore + ?Sized> InteractionStore for $wrapper {
            fn count_decisions(
                &self,
                food_id: &FoodId,
                decision: Decision,
            ) -> Result<u32, StoreError> {
                (**self).count_decisions(food_id, decision)
            }

            fn latest_decision(
                &self,
                food_id: &FoodId,
                decision: Decision,
            ) -> Result<Option<DecisionRecord>, StoreError> {
                (**self).latest_decision(food_id, decision)
            }

            fn decisions_for(&self, food_id: &FoodId) -> Result<Vec<DecisionRecord>, StoreError> {
                (**self).decisions_for(food_id)
            }

            fn average_rating(&self, food_id: &FoodId) -> Result<Option<f64>, StoreError> {
                (**self).average_rating(food_id)
            }

            fn most_recent_consumption(
                &self,
                food_id: &FoodId,
            ) -> Result<Option<DateTime<Utc>>, StoreError> {
                (**self).most_recent_consumption(food_id)
            }

            fn attach_review(
                &self,
                id: &DecisionId,
                review: &ReviewId,
            ) -> Result<DecisionRecord, StoreError> {
                (**self).attach_review(id, review)
            }

            fn begin(&self) -> Result<Box<dyn DecisionTransaction + '_>, StoreError> {
                (**self).begin()
            }
        }
    )+};
}

forward_catalog_store!(&C, Arc<C>);
forward_interaction_store!(&I, Arc<I>);
