//! `wemanage fix-session-table` — rebuild a corrupted session table.
//!
//! Destructive to session data: every logged-in user is logged out. The
//! table comes back exactly as the baseline defines it.

use anyhow::Result;
use sqlx::Connection;
use wemanage_storage::{catalog, rebuild_session_table, schema, DbConfig};

use super::{banner, step};

pub(crate) async fn run() -> Result<()> {
    banner("Fix session table (DESTRUCTIVE: all sessions are dropped)");

    let config = DbConfig::from_env();
    step(1, "connecting to database");
    let mut conn = config.connect_target().await?;
    let result = rebuild_and_verify(&mut conn).await;
    let close = conn.close().await;
    result?;
    close?;

    println!("Done.");
    Ok(())
}

async fn rebuild_and_verify(conn: &mut sqlx::PgConnection) -> Result<()> {
    step(2, "dropping and recreating \"session\" with its expiry index");
    rebuild_session_table(&mut *conn).await?;

    step(3, "verifying the rebuilt layout");
    let columns = catalog::table_columns(&mut *conn, "session").await?;
    println!("    columns: {}", columns.join(", "));
    let pkey = catalog::constraint_exists(&mut *conn, "session", schema::SESSION_PKEY_NAME).await?;
    let index = catalog::index_exists(&mut *conn, schema::SESSION_EXPIRE_INDEX_NAME).await?;
    if pkey && index {
        println!("    verification passed: primary key and expiry index present");
    } else {
        println!("    WARNING: pkey present: {pkey}, expiry index present: {index} — inspect output");
    }
    Ok(())
}
