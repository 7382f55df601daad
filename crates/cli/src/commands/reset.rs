//! `wemanage reset` — drop every application table. Development only.

use anyhow::Result;
use sqlx::Connection;
use wemanage_storage::{schema, DbConfig};

use super::{banner, step};

pub(crate) async fn run() -> Result<()> {
    banner("Reset database (DESTRUCTIVE)");
    println!("    dropping all {} application tables", schema::RESET_ORDER.len());

    let config = DbConfig::from_env();
    step(1, "connecting to database");
    let mut conn = config.connect_target().await?;
    let result = drop_all(&mut conn).await;
    let close = conn.close().await;
    result?;
    close?;

    println!("Done. Run `wemanage init` to recreate the schema.");
    Ok(())
}

async fn drop_all(conn: &mut sqlx::PgConnection) -> Result<()> {
    step(2, "dropping tables (children first, CASCADE as backstop)");
    for stmt in schema::reset_statements() {
        sqlx::query(&stmt).execute(&mut *conn).await?;
    }
    println!("    {} DROP statements executed", schema::RESET_ORDER.len());
    Ok(())
}
