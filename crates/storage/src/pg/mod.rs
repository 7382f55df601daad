//! PostgreSQL runtime storage using sqlx.
//!
//! Split into modular files by domain concern. `PgStorage` wraps the bounded
//! pool the live server shares across requests; the lifecycle CLI never goes
//! through it (single scoped connections, see [`crate::config`]).

mod sessions;
mod sharing;
mod users;
mod waitlist;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};
use wemanage_core::{
    env_parse_with_default, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};

use crate::catalog::{verify_tables, Verification};
use crate::config::DbConfig;
use crate::error::StorageError;
use crate::schema::{CORE_TABLES, SESSION_EXPIRE_INDEX_DDL, SESSION_TABLE_DDL};

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Build the shared pool for the live server.
    pub async fn connect(config: &DbConfig) -> Result<Self, StorageError> {
        let max_connections =
            env_parse_with_default("WEMANAGE_PG_MAX_CONNECTIONS", PG_POOL_MAX_CONNECTIONS);
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect_with(config.target_options()?)
            .await
            .map_err(StorageError::Database)?;
        tracing::info!(max_connections, "PgStorage initialized");
        Ok(Self { pool })
    }

    /// The underlying pool, for catalog probes and tests.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check that every core table is present. The server only consumes the
    /// schema; missing tables are reported, never auto-migrated.
    pub async fn verify_core_tables(&self) -> Result<Verification, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Database)?;
        verify_tables(&mut conn, CORE_TABLES).await
    }
}

/// Drop and recreate the `session` table with its expiry index.
///
/// The recovery path for a corrupted session table: every live session is
/// lost, the layout comes back exactly as the baseline defines it. Shared
/// between the `fix-session-table` CLI operation and the integration tests.
pub async fn rebuild_session_table(conn: &mut PgConnection) -> Result<(), StorageError> {
    sqlx::query(r#"DROP TABLE IF EXISTS "session""#).execute(&mut *conn).await?;
    sqlx::query(SESSION_TABLE_DDL).execute(&mut *conn).await?;
    sqlx::query(SESSION_EXPIRE_INDEX_DDL).execute(&mut *conn).await?;
    tracing::info!("session table rebuilt from the canonical definition");
    Ok(())
}
