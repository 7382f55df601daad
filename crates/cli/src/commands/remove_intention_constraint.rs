//! `wemanage remove-intention-constraint` — allow many intentions per day.
//!
//! Routes the `0003_drop_intention_unique` migration through the ledger and
//! then confirms the constraint is really gone. A no-op when already absent.

use anyhow::{anyhow, Result};
use sqlx::Connection;
use wemanage_storage::migrations::{find_migration, run_migration, MigrationOutcome};
use wemanage_storage::{catalog, schema, DbConfig};

use super::{banner, print_apply_report, step};

const MIGRATION_ID: &str = "0003_drop_intention_unique";

pub(crate) async fn run() -> Result<()> {
    banner("Remove daily-intention uniqueness constraint");

    let config = DbConfig::from_env();
    step(1, "connecting to database");
    let mut conn = config.connect_target().await?;
    let result = remove(&mut conn).await;
    let close = conn.close().await;
    result?;
    close?;

    println!("Done. Multiple intentions per day are now allowed.");
    Ok(())
}

async fn remove(conn: &mut sqlx::PgConnection) -> Result<()> {
    let migration =
        find_migration(MIGRATION_ID).ok_or_else(|| anyhow!("{MIGRATION_ID} not registered"))?;

    step(2, "dropping the constraint through the migration ledger");
    match run_migration(conn, migration).await? {
        MigrationOutcome::AlreadyApplied => println!("    already applied, nothing to do"),
        MigrationOutcome::Applied(report) => print_apply_report(&report),
    }

    step(3, "verifying the constraint is absent");
    let present = catalog::constraint_exists(
        &mut *conn,
        "daily_intentions",
        schema::INTENTION_UNIQUE_CONSTRAINT,
    )
    .await?;
    if present {
        println!("    WARNING: constraint still present — inspect output");
    } else {
        println!("    verification passed: constraint absent");
    }
    Ok(())
}
