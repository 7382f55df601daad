//! Catalog probes used for post-run verification.
//!
//! The lifecycle CLI reports whether the objects a script was supposed to
//! create (or drop) are actually there, by asking `pg_tables`,
//! `pg_constraint`, `pg_indexes` and `information_schema.columns` directly.
//! A mismatch is a warning for the operator, never a hard failure.

use sqlx::PgExecutor;

use crate::error::StorageError;

/// Whether a table exists in the public schema.
pub async fn table_exists<'e>(
    executor: impl PgExecutor<'e>,
    table: &str,
) -> Result<bool, StorageError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM pg_tables WHERE schemaname = 'public' AND tablename = $1
         )",
    )
    .bind(table)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Whether a named constraint exists on a table.
pub async fn constraint_exists<'e>(
    executor: impl PgExecutor<'e>,
    table: &str,
    constraint: &str,
) -> Result<bool, StorageError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM pg_constraint c
            JOIN pg_class t ON c.conrelid = t.oid
            WHERE t.relname = $1 AND c.conname = $2
         )",
    )
    .bind(table)
    .bind(constraint)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Whether a column exists on a table.
pub async fn column_exists<'e>(
    executor: impl PgExecutor<'e>,
    table: &str,
    column: &str,
) -> Result<bool, StorageError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2
         )",
    )
    .bind(table)
    .bind(column)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Whether a named index exists in the public schema.
pub async fn index_exists<'e>(
    executor: impl PgExecutor<'e>,
    index: &str,
) -> Result<bool, StorageError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM pg_indexes WHERE schemaname = 'public' AND indexname = $1
         )",
    )
    .bind(index)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Column names of a table, in ordinal order.
pub async fn table_columns<'e>(
    executor: impl PgExecutor<'e>,
    table: &str,
) -> Result<Vec<String>, StorageError> {
    let columns: Vec<String> = sqlx::query_scalar(
        "SELECT column_name FROM information_schema.columns
         WHERE table_schema = 'public' AND table_name = $1
         ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(executor)
    .await?;
    Ok(columns)
}

/// Outcome of checking an expected-tables list against the live catalog.
#[derive(Debug, Default)]
pub struct Verification {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl Verification {
    /// Whether every expected object was found.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Probe every table in `expected` and sort it into present/missing.
pub async fn verify_tables(
    conn: &mut sqlx::PgConnection,
    expected: &[&str],
) -> Result<Verification, StorageError> {
    let mut verification = Verification::default();
    for table in expected {
        if table_exists(&mut *conn, table).await? {
            verification.present.push((*table).to_owned());
        } else {
            verification.missing.push((*table).to_owned());
        }
    }
    Ok(verification)
}
