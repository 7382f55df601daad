//! `wemanage init` — create (if needed) and populate the database.
//!
//! Hosted mode (`DATABASE_URL` set): the provider already created the
//! database, so the schema is applied straight over the URI. Local mode:
//! connect to the maintenance database, `CREATE DATABASE` (duplicate is
//! fine), then apply the schema to the target. Both paths are re-runnable.

use anyhow::Result;
use sqlx::{Connection, PgConnection};
use wemanage_storage::classify::{classify_db_error, SqlErrorClass};
use wemanage_storage::runner::apply_script_tolerant;
use wemanage_storage::{catalog, ledger, schema, DbConfig};

use super::{banner, print_apply_report, print_verification, step};

pub(crate) async fn run() -> Result<()> {
    banner("Initialize database");
    let config = DbConfig::from_env();

    if config.is_hosted() {
        step(1, "connecting via DATABASE_URL");
    } else {
        step(1, &format!("ensuring database \"{}\" exists", config.database));
        create_database_if_absent(&config).await?;
        step(2, &format!("connecting to \"{}\"", config.database));
    }

    let mut conn = config.connect_target().await?;
    let result = init_schema(&mut conn, config.is_hosted()).await;
    let close = conn.close().await;
    result?;
    close?;

    println!("Done.");
    Ok(())
}

async fn create_database_if_absent(config: &DbConfig) -> Result<()> {
    let mut admin = config.connect_admin().await?;
    // CREATE DATABASE takes no bind parameters and no IF NOT EXISTS;
    // a duplicate is suppressed through the classifier instead.
    let result =
        sqlx::query(&format!(r#"CREATE DATABASE "{}""#, config.database)).execute(&mut admin).await;
    let close = admin.close().await;
    match result {
        Ok(_) => println!("    database created"),
        Err(err) if classify_db_error(&err) == SqlErrorClass::BenignDuplicate => {
            println!("    database already exists");
        },
        Err(err) => return Err(err.into()),
    }
    close?;
    Ok(())
}

async fn init_schema(conn: &mut PgConnection, hosted: bool) -> Result<()> {
    let base = if hosted { 1 } else { 2 };
    step(base + 1, "applying schema (statement-tolerant)");
    let report = apply_script_tolerant(conn, &schema::base_schema()).await?;
    print_apply_report(&report);

    step(base + 2, "recording baseline in the migration ledger");
    ledger::ensure_ledger(&mut *conn).await?;
    ledger::record_applied(&mut *conn, ledger::BASELINE_MIGRATION_ID).await?;

    step(base + 3, "verifying expected tables");
    let verification = catalog::verify_tables(conn, schema::CORE_TABLES).await?;
    print_verification(&verification);
    Ok(())
}
