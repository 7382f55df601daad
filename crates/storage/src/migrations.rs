//! Named incremental migrations.
//!
//! Each migration is an SQL script applied atomically, with its ledger row
//! inserted inside the same transaction. A second run finds the ledger row
//! and does nothing.

use sqlx::{Connection, PgConnection};

use crate::error::StorageError;
use crate::ledger;
use crate::runner::{apply_in_transaction, ApplyReport};
use crate::schema::INTENTION_UNIQUE_CONSTRAINT;

/// One shippable incremental migration.
#[derive(Debug)]
pub struct Migration {
    /// Ledger identifier, `NNNN_snake_case_summary`.
    pub id: &'static str,
    /// One line for the operator.
    pub summary: &'static str,
    /// The SQL to apply (splittable, see [`crate::runner`]).
    pub script: &'static str,
    /// Tables that must exist after a successful apply.
    pub expected_tables: &'static [&'static str],
}

/// All shipped migrations, oldest first. The baseline schema is not listed
/// here; `init` applies it tolerantly and records it directly.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "0002_lists",
        summary: "lists and list items with sharing columns",
        script: "
CREATE TABLE IF NOT EXISTS lists (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    share_code TEXT UNIQUE,
    is_shared BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_lists_share_code ON lists (share_code);

CREATE TABLE IF NOT EXISTS list_items (
    id BIGSERIAL PRIMARY KEY,
    list_id BIGINT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    is_done BOOLEAN NOT NULL DEFAULT FALSE,
    note TEXT,
    tag TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_list_items_list ON list_items (list_id);
",
        expected_tables: &["lists", "list_items"],
    },
    Migration {
        id: "0003_drop_intention_unique",
        summary: "allow more than one daily intention per day",
        script: "ALTER TABLE daily_intentions \
                 DROP CONSTRAINT IF EXISTS daily_intentions_user_id_entry_date_key;",
        expected_tables: &[],
    },
];

/// Look up a migration by id.
pub fn find_migration(id: &str) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.id == id)
}

/// What [`run_migration`] did.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// The ledger already carried the id; nothing was executed.
    AlreadyApplied,
    /// The script ran and the ledger row was committed with it.
    Applied(ApplyReport),
}

/// Apply one named migration through the ledger.
///
/// The script and its ledger row commit or roll back together; a crash can
/// never leave the ledger claiming more than the catalog holds.
pub async fn run_migration(
    conn: &mut PgConnection,
    migration: &Migration,
) -> Result<MigrationOutcome, StorageError> {
    ledger::ensure_ledger(&mut *conn).await?;
    if ledger::is_applied(&mut *conn, migration.id).await? {
        tracing::info!(id = migration.id, "migration already applied, skipping");
        return Ok(MigrationOutcome::AlreadyApplied);
    }

    let mut tx = conn.begin().await?;
    let report = apply_in_transaction(&mut tx, migration.script).await?;
    ledger::record_applied(&mut *tx, migration.id).await?;
    tx.commit().await?;
    Ok(MigrationOutcome::Applied(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::split_statements;

    #[test]
    fn ids_are_unique_and_ordered() {
        let ids: Vec<_> = MIGRATIONS.iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted, "migration ids must be unique and in order");
    }

    #[test]
    fn every_script_survives_the_splitter() {
        for migration in MIGRATIONS {
            let statements = split_statements(migration.script);
            assert!(!statements.is_empty(), "{} splits to nothing", migration.id);
        }
    }

    #[test]
    fn drop_intention_unique_targets_the_baseline_constraint() {
        let migration = find_migration("0003_drop_intention_unique").unwrap();
        assert!(migration.script.contains(INTENTION_UNIQUE_CONSTRAINT));
        assert!(migration.script.contains("DROP CONSTRAINT IF EXISTS"));
    }

    #[test]
    fn find_migration_misses_unknown_ids() {
        assert!(find_migration("0099_nope").is_none());
    }
}
