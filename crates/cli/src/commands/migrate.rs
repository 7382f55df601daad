//! `wemanage migrate <name>` — apply one named incremental migration.

use anyhow::{bail, Result};
use sqlx::Connection;
use wemanage_storage::migrations::{find_migration, run_migration, MigrationOutcome, MIGRATIONS};
use wemanage_storage::{catalog, DbConfig};

use super::{banner, print_apply_report, print_verification, step};

pub(crate) async fn run(name: &str) -> Result<()> {
    banner(&format!("Migrate: {name}"));
    let Some(migration) = find_migration(name) else {
        let known: Vec<_> = MIGRATIONS.iter().map(|m| m.id).collect();
        bail!("unknown migration {name:?}; available: {}", known.join(", "));
    };
    println!("    {}", migration.summary);

    let config = DbConfig::from_env();
    step(1, "connecting to database");
    let mut conn = config.connect_target().await?;
    let result = migrate(&mut conn, migration).await;
    let close = conn.close().await;
    result?;
    close?;

    println!("Done.");
    Ok(())
}

async fn migrate(
    conn: &mut sqlx::PgConnection,
    migration: &wemanage_storage::migrations::Migration,
) -> Result<()> {
    step(2, "applying through the migration ledger");
    match run_migration(conn, migration).await? {
        MigrationOutcome::AlreadyApplied => {
            println!("    already applied, nothing to do");
        },
        MigrationOutcome::Applied(report) => print_apply_report(&report),
    }

    if !migration.expected_tables.is_empty() {
        step(3, "verifying expected tables");
        let verification = catalog::verify_tables(conn, migration.expected_tables).await?;
        print_verification(&verification);
    }
    Ok(())
}
