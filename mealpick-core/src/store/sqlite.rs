//! SQLite-backed catalog and interaction store.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, Utc};
use log::warn;
use rusqlite::{Connection, OptionalExtension, Row};
use thiserror::Error;

use crate::{
    ConsumptionRecord, Cuisine, Decision, DecisionId, DecisionRecord, FoodId, FoodItem, ReviewId,
};

use super::schema::{SchemaError, initialise_schema};
use super::{CatalogStore, DecisionTransaction, InteractionStore, StoreError};

/// Upper bound on how long a call waits for a competing writer.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const DECISION_COLUMNS: &str =
    "decision_id, food_id, is_accepted, created_at, linked_review_id";

/// Error raised when opening a SQLite store.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Configuring the connection failed.
    #[error("failed to configure SQLite connection: {source}")]
    Configure {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating or validating the schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Catalog and interaction store backed by a single SQLite connection.
///
/// The connection sits behind a mutex, so decision transactions on one
/// store are serialized; `BEGIN IMMEDIATE` extends that to other processes
/// sharing the database file.
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, SqliteStoreError> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(|source| SqliteStoreError::Configure { source })?;
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Append a consumption record for an item.
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] when the insert fails.
    pub fn record_consumption(&self, record: &ConsumptionRecord) -> Result<(), StoreError> {
        let connection = self.lock("record consumption")?;
        insert_consumption(&connection, record)
    }

    /// Append a consumption record and link `review` to the decision named
    /// in `link`, in one transaction.
    ///
    /// Returns the linked decision when `link` is given. A rejected link or a
    /// failed insert leaves both tables untouched.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownDecision`] or
    /// [`StoreError::ReviewConflict`] for a rejected link and
    /// [`StoreError::Persistence`] when a write fails.
    pub fn record_review(
        &self,
        record: &ConsumptionRecord,
        link: Option<(&DecisionId, &ReviewId)>,
    ) -> Result<Option<DecisionRecord>, StoreError> {
        const OPERATION: &str = "record review";
        let mut connection = self.lock(OPERATION)?;
        let transaction = connection
            .transaction()
            .map_err(|source| write_fault(OPERATION, source))?;
        let linked = link
            .map(|(id, review)| link_review(&transaction, id, review))
            .transpose()?;
        insert_consumption(&transaction, record)?;
        transaction
            .commit()
            .map_err(|source| write_fault(OPERATION, source))?;
        Ok(linked)
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::unavailable(operation, "connection mutex poisoned"))
    }
}

/// Chooses how a `rusqlite` failure is reported: reads surface as
/// [`StoreError::Unavailable`], writes as [`StoreError::Persistence`].
type Fault = fn(&'static str, rusqlite::Error) -> StoreError;

fn read_fault(operation: &'static str, source: rusqlite::Error) -> StoreError {
    StoreError::unavailable(operation, source)
}

fn write_fault(operation: &'static str, source: rusqlite::Error) -> StoreError {
    StoreError::persistence(operation, source)
}

struct DecisionRow {
    id: String,
    food_id: String,
    accepted: bool,
    created_at: i64,
    linked_review_id: Option<String>,
}

impl DecisionRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            food_id: row.get(1)?,
            accepted: row.get(2)?,
            created_at: row.get(3)?,
            linked_review_id: row.get(4)?,
        })
    }

    fn into_record(self, operation: &'static str) -> Result<DecisionRecord, StoreError> {
        Ok(DecisionRecord {
            id: DecisionId::new(self.id),
            food_id: FoodId::new(self.food_id),
            decision: Decision::from_accepted(self.accepted),
            created_at: from_millis(self.created_at, operation)?,
            linked_review_id: self.linked_review_id.map(ReviewId::new),
        })
    }
}

fn from_millis(millis: i64, operation: &'static str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| StoreError::Corrupt {
        operation,
        detail: format!("timestamp {millis} is out of range"),
    })
}

fn query_latest_decision(
    connection: &Connection,
    food_id: &FoodId,
    decision: Decision,
    fault: Fault,
) -> Result<Option<DecisionRecord>, StoreError> {
    const OPERATION: &str = "read latest decision";
    let sql = format!(
        "SELECT {DECISION_COLUMNS} FROM decisions
         WHERE food_id = ?1 AND is_accepted = ?2
         ORDER BY created_at DESC, rowid DESC
         LIMIT 1"
    );
    let mut statement = connection
        .prepare_cached(&sql)
        .map_err(|source| fault(OPERATION, source))?;
    statement
        .query_row((food_id.as_str(), decision.is_accepted()), DecisionRow::read)
        .optional()
        .map_err(|source| fault(OPERATION, source))?
        .map(|row| row.into_record(OPERATION))
        .transpose()
}

fn query_decision(
    connection: &Connection,
    id: &DecisionId,
    fault: Fault,
) -> Result<Option<DecisionRecord>, StoreError> {
    const OPERATION: &str = "read decision";
    let sql = format!("SELECT {DECISION_COLUMNS} FROM decisions WHERE decision_id = ?1");
    let mut statement = connection
        .prepare_cached(&sql)
        .map_err(|source| fault(OPERATION, source))?;
    statement
        .query_row([id.as_str()], DecisionRow::read)
        .optional()
        .map_err(|source| fault(OPERATION, source))?
        .map(|row| row.into_record(OPERATION))
        .transpose()
}

fn insert_consumption(
    connection: &Connection,
    record: &ConsumptionRecord,
) -> Result<(), StoreError> {
    connection
        .execute(
            "INSERT INTO consumptions (food_id, rating, ate_at) VALUES (?1, ?2, ?3)",
            (
                record.food_id.as_str(),
                record.rating,
                record.ate_at.timestamp_millis(),
            ),
        )
        .map(|_| ())
        .map_err(|source| write_fault("record consumption", source))
}

// Set `linked_review_id` on decision `id`. Relinking the same review is a
// no-op; the caller owns the surrounding transaction.
fn link_review(
    connection: &Connection,
    id: &DecisionId,
    review: &ReviewId,
) -> Result<DecisionRecord, StoreError> {
    const OPERATION: &str = "attach review";
    let Some(mut record) = query_decision(connection, id, write_fault)? else {
        return Err(StoreError::UnknownDecision { id: id.clone() });
    };
    match record.linked_review_id.take() {
        Some(existing) if existing == *review => {
            record.linked_review_id = Some(existing);
            return Ok(record);
        }
        Some(existing) => {
            return Err(StoreError::ReviewConflict {
                id: id.clone(),
                existing,
            });
        }
        None => {}
    }
    connection
        .execute(
            "UPDATE decisions SET linked_review_id = ?1 WHERE decision_id = ?2",
            (review.as_str(), id.as_str()),
        )
        .map_err(|source| write_fault(OPERATION, source))?;
    record.linked_review_id = Some(review.clone());
    Ok(record)
}

fn read_food_item(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_food_item(
    (id, cuisine, category): (String, String, String),
    operation: &'static str,
) -> Result<FoodItem, StoreError> {
    let cuisine = cuisine
        .parse::<Cuisine>()
        .map_err(|err| StoreError::Corrupt {
            operation,
            detail: err.to_string(),
        })?;
    Ok(FoodItem::new(FoodId::new(id), cuisine, category))
}

impl CatalogStore for SqliteStore {
    fn list_all_items(&self) -> Result<Vec<FoodItem>, StoreError> {
        const OPERATION: &str = "list catalog items";
        let connection = self.lock(OPERATION)?;
        let mut statement = connection
            .prepare_cached("SELECT food_id, cuisine, category FROM food_items ORDER BY rowid")
            .map_err(|source| read_fault(OPERATION, source))?;
        let rows = statement
            .query_map([], read_food_item)
            .map_err(|source| read_fault(OPERATION, source))?;

        let mut items = Vec::new();
        for row in rows {
            let raw = row.map_err(|source| read_fault(OPERATION, source))?;
            items.push(into_food_item(raw, OPERATION)?);
        }
        Ok(items)
    }

    fn get_or_create(&self, cuisine: Cuisine, category: &str) -> Result<FoodItem, StoreError> {
        const OPERATION: &str = "get or create catalog item";
        let mut connection = self.lock(OPERATION)?;
        let transaction = connection
            .transaction()
            .map_err(|source| write_fault(OPERATION, source))?;
        transaction
            .execute(
                "INSERT INTO food_items (food_id, cuisine, category) VALUES (?1, ?2, ?3)
                 ON CONFLICT(category) DO NOTHING",
                (FoodId::generate().as_str(), cuisine.as_str(), category),
            )
            .map_err(|source| write_fault(OPERATION, source))?;
        let raw = transaction
            .query_row(
                "SELECT food_id, cuisine, category FROM food_items WHERE category = ?1",
                [category],
                read_food_item,
            )
            .map_err(|source| write_fault(OPERATION, source))?;
        transaction
            .commit()
            .map_err(|source| write_fault(OPERATION, source))?;
        into_food_item(raw, OPERATION)
    }

    fn get_item(&self, id: &FoodId) -> Result<Option<FoodItem>, StoreError> {
        const OPERATION: &str = "read catalog item";
        let connection = self.lock(OPERATION)?;
        connection
            .query_row(
                "SELECT food_id, cuisine, category FROM food_items WHERE food_id = ?1",
                [id.as_str()],
                read_food_item,
            )
            .optional()
            .map_err(|source| read_fault(OPERATION, source))?
            .map(|raw| into_food_item(raw, OPERATION))
            .transpose()
    }
}

impl InteractionStore for SqliteStore {
    fn count_decisions(&self, food_id: &FoodId, decision: Decision) -> Result<u32, StoreError> {
        const OPERATION: &str = "count decisions";
        let connection = self.lock(OPERATION)?;
        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM decisions WHERE food_id = ?1 AND is_accepted = ?2",
                (food_id.as_str(), decision.is_accepted()),
                |row| row.get(0),
            )
            .map_err(|source| read_fault(OPERATION, source))?;
        u32::try_from(count).map_err(|_| StoreError::Corrupt {
            operation: OPERATION,
            detail: format!("decision count {count} is out of range"),
        })
    }

    fn latest_decision(
        &self,
        food_id: &FoodId,
        decision: Decision,
    ) -> Result<Option<DecisionRecord>, StoreError> {
        let connection = self.lock("read latest decision")?;
        query_latest_decision(&connection, food_id, decision, read_fault)
    }

    fn decisions_for(&self, food_id: &FoodId) -> Result<Vec<DecisionRecord>, StoreError> {
        const OPERATION: &str = "list decisions";
        let connection = self.lock(OPERATION)?;
        let sql = format!(
            "SELECT {DECISION_COLUMNS} FROM decisions
             WHERE food_id = ?1
             ORDER BY created_at ASC, rowid ASC"
        );
        let mut statement = connection
            .prepare_cached(&sql)
            .map_err(|source| read_fault(OPERATION, source))?;
        let rows = statement
            .query_map([food_id.as_str()], DecisionRow::read)
            .map_err(|source| read_fault(OPERATION, source))?;

        let mut records = Vec::new();
        for row in rows {
            let raw = row.map_err(|source| read_fault(OPERATION, source))?;
            records.push(raw.into_record(OPERATION)?);
        }
        Ok(records)
    }

    fn average_rating(&self, food_id: &FoodId) -> Result<Option<f64>, StoreError> {
        const OPERATION: &str = "average ratings";
        let connection = self.lock(OPERATION)?;
        connection
            .query_row(
                "SELECT AVG(rating) FROM consumptions WHERE food_id = ?1",
                [food_id.as_str()],
                |row| row.get(0),
            )
            .map_err(|source| read_fault(OPERATION, source))
    }

    fn most_recent_consumption(
        &self,
        food_id: &FoodId,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        const OPERATION: &str = "read most recent consumption";
        let connection = self.lock(OPERATION)?;
        let millis: Option<i64> = connection
            .query_row(
                "SELECT MAX(ate_at) FROM consumptions WHERE food_id = ?1",
                [food_id.as_str()],
                |row| row.get(0),
            )
            .map_err(|source| read_fault(OPERATION, source))?;
        millis.map(|value| from_millis(value, OPERATION)).transpose()
    }

    fn attach_review(
        &self,
        id: &DecisionId,
        review: &ReviewId,
    ) -> Result<DecisionRecord, StoreError> {
        const OPERATION: &str = "attach review";
        let mut connection = self.lock(OPERATION)?;
        let transaction = connection
            .transaction()
            .map_err(|source| write_fault(OPERATION, source))?;
        let record = link_review(&transaction, id, review)?;
        transaction
            .commit()
            .map_err(|source| write_fault(OPERATION, source))?;
        Ok(record)
    }

    fn begin(&self) -> Result<Box<dyn DecisionTransaction + '_>, StoreError> {
        const OPERATION: &str = "begin decision transaction";
        let connection = self.lock(OPERATION)?;
        connection
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(|source| write_fault(OPERATION, source))?;
        Ok(Box::new(SqliteDecisionTransaction {
            connection,
            finished: false,
        }))
    }
}

/// An open `BEGIN IMMEDIATE` transaction holding the connection lock.
///
/// Rolled back on drop unless committed.
struct SqliteDecisionTransaction<'store> {
    connection: MutexGuard<'store, Connection>,
    finished: bool,
}

impl DecisionTransaction for SqliteDecisionTransaction<'_> {
    fn latest_decision(
        &mut self,
        food_id: &FoodId,
        decision: Decision,
    ) -> Result<Option<DecisionRecord>, StoreError> {
        query_latest_decision(&self.connection, food_id, decision, write_fault)
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
        self.connection
            .execute(
                "INSERT INTO decisions (decision_id, food_id, is_accepted, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                (
                    record.id.as_str(),
                    food_id.as_str(),
                    decision.is_accepted(),
                    created_at.timestamp_millis(),
                ),
            )
            .map_err(|source| write_fault("insert decision", source))?;
        Ok(record)
    }

    fn delete_decision(&mut self, id: &DecisionId) -> Result<(), StoreError> {
        let deleted = self
            .connection
            .execute("DELETE FROM decisions WHERE decision_id = ?1", [id.as_str()])
            .map_err(|source| write_fault("delete decision", source))?;
        if deleted == 0 {
            return Err(StoreError::UnknownDecision { id: id.clone() });
        }
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.connection
            .execute_batch("COMMIT")
            .map_err(|source| write_fault("commit decision transaction", source))?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteDecisionTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.connection.execute_batch("ROLLBACK") {
            warn!("failed to roll back decision transaction: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, hour, minute, 0)
            .single()
            .expect("valid instant")
    }

    #[fixture]
    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("open in-memory store")
    }

    fn record(store: &SqliteStore, food_id: &FoodId, decision: Decision, when: DateTime<Utc>) {
        let mut transaction = store.begin().expect("begin");
        transaction
            .insert_decision(food_id, decision, when)
            .expect("insert decision");
        transaction.commit().expect("commit");
    }

    #[rstest]
    fn catalog_creates_items_once_per_category(store: SqliteStore) {
        let first = store
            .get_or_create(Cuisine::Japanese, "Ramen")
            .expect("create");
        let again = store
            .get_or_create(Cuisine::Western, "Ramen")
            .expect("fetch");
        let pizza = store
            .get_or_create(Cuisine::Western, "Pizza")
            .expect("create pizza");

        assert_eq!(first, again);
        assert_eq!(again.cuisine, Cuisine::Japanese);
        assert_eq!(
            store.list_all_items().expect("list"),
            vec![first.clone(), pizza]
        );
        assert_eq!(store.get_item(&first.id).expect("lookup"), Some(first));
    }

    #[rstest]
    fn counts_and_latest_decisions(store: SqliteStore) {
        let food = FoodId::new("F1");
        record(&store, &food, Decision::Accept, at(9, 0));
        record(&store, &food, Decision::Accept, at(10, 0));
        record(&store, &food, Decision::Skip, at(11, 0));

        assert_eq!(store.count_decisions(&food, Decision::Accept).expect("count"), 2);
        assert_eq!(store.count_decisions(&food, Decision::Skip).expect("count"), 1);
        let latest = store
            .latest_decision(&food, Decision::Accept)
            .expect("latest")
            .expect("an accept exists");
        assert_eq!(latest.created_at, at(10, 0));
        assert_eq!(store.decisions_for(&food).expect("list").len(), 3);
    }

    #[rstest]
    fn latest_decision_breaks_timestamp_ties_by_insertion_order(store: SqliteStore) {
        let food = FoodId::new("F1");
        let mut transaction = store.begin().expect("begin");
        transaction
            .insert_decision(&food, Decision::Accept, at(9, 0))
            .expect("first");
        let second = transaction
            .insert_decision(&food, Decision::Accept, at(9, 0))
            .expect("second");
        transaction.commit().expect("commit");

        let latest = store
            .latest_decision(&food, Decision::Accept)
            .expect("latest")
            .expect("an accept exists");
        assert_eq!(latest.id, second.id);
    }

    #[rstest]
    fn dropping_a_transaction_rolls_back(store: SqliteStore) {
        let food = FoodId::new("F1");
        {
            let mut transaction = store.begin().expect("begin");
            transaction
                .insert_decision(&food, Decision::Skip, at(9, 0))
                .expect("insert");
        }
        assert_eq!(store.count_decisions(&food, Decision::Skip).expect("count"), 0);
    }

    #[rstest]
    fn deleting_unknown_decision_errors(store: SqliteStore) {
        let mut transaction = store.begin().expect("begin");
        let err = transaction
            .delete_decision(&DecisionId::new("missing"))
            .expect_err("unknown decision");
        assert!(matches!(err, StoreError::UnknownDecision { .. }));
    }

    #[rstest]
    fn aggregates_consumption_history(store: SqliteStore) {
        let food = FoodId::new("F1");
        assert!(store.average_rating(&food).expect("avg").is_none());
        assert!(store.most_recent_consumption(&food).expect("max").is_none());

        for (rating, ate_at) in [(4.0, at(12, 0)), (5.0, at(12, 0) - TimeDelta::days(3))] {
            store
                .record_consumption(&ConsumptionRecord {
                    food_id: food.clone(),
                    rating,
                    ate_at,
                })
                .expect("record consumption");
        }

        assert_eq!(store.average_rating(&food).expect("avg"), Some(4.5));
        assert_eq!(
            store.most_recent_consumption(&food).expect("max"),
            Some(at(12, 0))
        );
    }

    #[rstest]
    fn attach_review_is_idempotent_and_rejects_conflicts(store: SqliteStore) {
        let food = FoodId::new("F1");
        let mut transaction = store.begin().expect("begin");
        let decision = transaction
            .insert_decision(&food, Decision::Accept, at(9, 0))
            .expect("insert");
        transaction.commit().expect("commit");

        let review = ReviewId::new("R1");
        let linked = store.attach_review(&decision.id, &review).expect("link");
        assert_eq!(linked.linked_review_id, Some(review.clone()));
        let again = store.attach_review(&decision.id, &review).expect("relink");
        assert_eq!(again, linked);

        let err = store
            .attach_review(&decision.id, &ReviewId::new("R2"))
            .expect_err("conflicting review");
        assert!(matches!(err, StoreError::ReviewConflict { existing, .. } if existing == review));

        let err = store
            .attach_review(&DecisionId::new("missing"), &review)
            .expect_err("unknown decision");
        assert!(matches!(err, StoreError::UnknownDecision { .. }));
    }

    #[rstest]
    fn record_review_links_and_records_together(store: SqliteStore) {
        let food = FoodId::new("F1");
        let mut transaction = store.begin().expect("begin");
        let decision = transaction
            .insert_decision(&food, Decision::Accept, at(9, 0))
            .expect("insert");
        transaction.commit().expect("commit");
        let review = ReviewId::new("R1");
        let consumption = ConsumptionRecord {
            food_id: food.clone(),
            rating: 4.0,
            ate_at: at(12, 0),
        };

        let linked = store
            .record_review(&consumption, Some((&decision.id, &review)))
            .expect("record review")
            .expect("linked decision");

        assert_eq!(linked.linked_review_id, Some(review));
        assert_eq!(store.average_rating(&food).expect("avg"), Some(4.0));
    }

    #[rstest]
    fn failed_consumption_insert_undoes_the_link(store: SqliteStore) {
        let food = FoodId::new("F1");
        let mut transaction = store.begin().expect("begin");
        let decision = transaction
            .insert_decision(&food, Decision::Accept, at(9, 0))
            .expect("insert");
        transaction.commit().expect("commit");
        // SQLite binds NaN as NULL, which the NOT NULL rating column rejects.
        let unstorable = ConsumptionRecord {
            food_id: food.clone(),
            rating: f64::NAN,
            ate_at: at(12, 0),
        };

        let err = store
            .record_review(&unstorable, Some((&decision.id, &ReviewId::new("R1"))))
            .expect_err("insert fails");

        assert!(matches!(err, StoreError::Persistence { .. }));
        let latest = store
            .latest_decision(&food, Decision::Accept)
            .expect("latest")
            .expect("accept exists");
        assert!(latest.linked_review_id.is_none());
        assert!(store.average_rating(&food).expect("avg").is_none());
    }

    #[rstest]
    fn rejected_link_records_no_consumption(store: SqliteStore) {
        let food = FoodId::new("F1");
        let consumption = ConsumptionRecord {
            food_id: food.clone(),
            rating: 3.5,
            ate_at: at(12, 0),
        };

        let err = store
            .record_review(
                &consumption,
                Some((&DecisionId::new("missing"), &ReviewId::new("R1"))),
            )
            .expect_err("unknown decision");

        assert!(matches!(err, StoreError::UnknownDecision { .. }));
        assert!(store.most_recent_consumption(&food).expect("max").is_none());
    }

    #[rstest]
    fn reopening_a_database_keeps_history() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("mealpick.db");
        let food = FoodId::new("F1");
        {
            let store = SqliteStore::open(&path).expect("open store");
            record(&store, &food, Decision::Accept, at(9, 0));
        }
        let store = SqliteStore::open(&path).expect("reopen store");
        assert_eq!(store.count_decisions(&food, Decision::Accept).expect("count"), 1);
    }

    #[rstest]
    fn rejects_unknown_schema_version() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("mealpick.db");
        {
            let connection = Connection::open(&path).expect("create database");
            connection
                .execute_batch(
                    "CREATE TABLE mealpick_schema_version (
                        version INTEGER PRIMARY KEY,
                        applied_at TEXT NOT NULL DEFAULT ''
                    ) WITHOUT ROWID;
                    INSERT INTO mealpick_schema_version (version) VALUES (99);",
                )
                .expect("stamp future version");
        }
        let err = SqliteStore::open(&path).expect_err("version mismatch");
        assert!(matches!(
            err,
            SqliteStoreError::Schema(SchemaError::VersionMismatch { found: 99, .. })
        ));
    }
}
