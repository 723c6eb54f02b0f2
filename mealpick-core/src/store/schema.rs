//! SQLite schema for the catalog and interaction tables.

use rusqlite::{Connection, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `mealpick_schema_version` by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the catalog and interaction tables if they are missing.
///
/// Every step runs inside one transaction. Databases stamped with a
/// different schema version are rejected so migrations can be applied
/// explicitly.
pub(super) fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create food_items",
        "CREATE TABLE IF NOT EXISTS food_items (
            food_id TEXT PRIMARY KEY CHECK (length(trim(food_id)) > 0),
            cuisine TEXT NOT NULL,
            category TEXT NOT NULL UNIQUE
        )",
    )?;
    // Decisions and consumptions reference items by id only; the catalog's
    // identity scheme can change without touching the history.
    run_migration_step(
        transaction,
        "create decisions",
        "CREATE TABLE IF NOT EXISTS decisions (
            decision_id TEXT PRIMARY KEY,
            food_id TEXT NOT NULL,
            is_accepted INTEGER NOT NULL CHECK (is_accepted IN (0, 1)),
            created_at INTEGER NOT NULL,
            linked_review_id TEXT
        )",
    )?;
    run_migration_step(
        transaction,
        "create consumptions",
        "CREATE TABLE IF NOT EXISTS consumptions (
            food_id TEXT NOT NULL,
            rating REAL NOT NULL,
            ate_at INTEGER NOT NULL
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index decisions",
        "CREATE INDEX IF NOT EXISTS idx_decisions_food
            ON decisions(food_id, is_accepted, created_at)",
    )?;
    run_migration_step(
        transaction,
        "index consumptions",
        "CREATE INDEX IF NOT EXISTS idx_consumptions_food
            ON consumptions(food_id, ate_at)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS mealpick_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM mealpick_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO mealpick_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised while creating or validating the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A migration statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Name of the failed step.
        step: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The database was created by a different schema version.
    #[error(
        "expected mealpick schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}
