//! Applied-migrations ledger.
//!
//! "Has this migration run" is a direct lookup against `schema_migrations`,
//! recorded in the same transaction as the migration's effect. The catalog
//! probes in [`crate::catalog`] stay what they are: verification, not state
//! detection.

use sqlx::PgExecutor;

use crate::error::StorageError;

/// Identifier recorded for the full base schema applied by `init`.
pub const BASELINE_MIGRATION_ID: &str = "0001_base_schema";

const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    id TEXT PRIMARY KEY,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

/// Create the ledger table if it is not there yet.
pub async fn ensure_ledger<'e>(executor: impl PgExecutor<'e>) -> Result<(), StorageError> {
    sqlx::query(LEDGER_DDL).execute(executor).await?;
    Ok(())
}

/// Whether a migration id is recorded as applied.
pub async fn is_applied<'e>(
    executor: impl PgExecutor<'e>,
    id: &str,
) -> Result<bool, StorageError> {
    let applied: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM schema_migrations WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
    Ok(applied)
}

/// Record a migration id as applied. Upsert, so re-recording (a re-run of
/// `init`, a replayed transaction) is a no-op rather than an error.
pub async fn record_applied<'e>(
    executor: impl PgExecutor<'e>,
    id: &str,
) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO schema_migrations (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Applied migration ids, oldest first.
pub async fn applied_ids<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<String>, StorageError> {
    let ids: Vec<String> =
        sqlx::query_scalar("SELECT id FROM schema_migrations ORDER BY applied_at, id")
            .fetch_all(executor)
            .await?;
    Ok(ids)
}
