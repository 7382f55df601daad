//! Integration tests for the PostgreSQL storage layer.
//! Run with: DATABASE_URL=... cargo test -p wemanage-storage -- --ignored pg_
//!
//! Point DATABASE_URL at a dedicated, disposable database: several tests
//! rebuild or drop tables.

#![allow(clippy::unwrap_used, reason = "integration test code")]

use chrono::{Duration, Utc};
use sqlx::{Connection, PgConnection};
use uuid::Uuid;
use wemanage_core::SessionRecord;
use wemanage_storage::catalog;
use wemanage_storage::ledger;
use wemanage_storage::migrations::{find_migration, run_migration, MigrationOutcome};
use wemanage_storage::runner::apply_script_tolerant;
use wemanage_storage::schema;
use wemanage_storage::{
    rebuild_session_table, DbConfig, PgStorage, SessionStore, ShareStore, StorageError,
    UserStore, WaitlistStore,
};

fn database_url() -> String {
    std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for storage integration tests")
}

async fn connect() -> PgConnection {
    PgConnection::connect(&database_url()).await.expect("failed to connect to PostgreSQL")
}

/// Apply the base schema so every test starts from a usable catalog, no
/// matter what a destructive test before it did.
async fn ensure_schema(conn: &mut PgConnection) {
    let report = apply_script_tolerant(conn, &schema::base_schema()).await.unwrap();
    assert!(report.is_clean(), "base schema must apply cleanly: {:?}", report.failures);
    ledger::ensure_ledger(&mut *conn).await.unwrap();
}

async fn create_storage() -> PgStorage {
    let config = DbConfig::from_env();
    PgStorage::connect(&config).await.expect("failed to build pool")
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

async fn create_test_user(storage: &PgStorage) -> i64 {
    let email = format!("{}@test.invalid", unique("user"));
    storage.create_user(&email, "x-not-a-real-hash", None).await.unwrap().id
}

// ── Migration runner ─────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_base_schema_is_idempotent() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;

    // Second run: every object already exists, nothing may fail.
    let report = apply_script_tolerant(&mut conn, &schema::base_schema()).await.unwrap();
    assert!(report.is_clean(), "re-run failed: {:?}", report.failures);

    let verification = catalog::verify_tables(&mut conn, schema::CORE_TABLES).await.unwrap();
    assert!(verification.is_complete(), "missing tables: {:?}", verification.missing);
    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_named_migration_is_recorded_and_skipped_on_rerun() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;

    let migration = find_migration("0002_lists").unwrap();
    // Wipe the ledger row so the first run actually applies.
    sqlx::query("DELETE FROM schema_migrations WHERE id = $1")
        .bind(migration.id)
        .execute(&mut conn)
        .await
        .unwrap();

    let first = run_migration(&mut conn, migration).await.unwrap();
    assert!(matches!(first, MigrationOutcome::Applied(_)));
    assert!(ledger::is_applied(&mut conn, migration.id).await.unwrap());

    let second = run_migration(&mut conn, migration).await.unwrap();
    assert!(matches!(second, MigrationOutcome::AlreadyApplied));

    let verification = catalog::verify_tables(&mut conn, migration.expected_tables).await.unwrap();
    assert!(verification.is_complete());
    conn.close().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_reset_then_init_reproduces_the_fresh_table_set() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;

    for stmt in schema::reset_statements() {
        sqlx::query(&stmt).execute(&mut conn).await.unwrap();
    }
    let after_reset = catalog::verify_tables(&mut conn, schema::CORE_TABLES).await.unwrap();
    assert!(after_reset.present.is_empty(), "still present: {:?}", after_reset.present);

    ensure_schema(&mut conn).await;
    ledger::record_applied(&mut conn, ledger::BASELINE_MIGRATION_ID).await.unwrap();
    let after_init = catalog::verify_tables(&mut conn, schema::CORE_TABLES).await.unwrap();
    assert!(after_init.is_complete(), "missing after init: {:?}", after_init.missing);
    conn.close().await.unwrap();
}

// ── Daily intention constraint ───────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_intention_uniqueness_holds_until_the_constraint_is_dropped() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;

    let storage = create_storage().await;
    let user_id = create_test_user(&storage).await;

    // Put the baseline constraint back in case an earlier run dropped it
    // (clearing leftover duplicates first), and clear its ledger row so the
    // drop migration will run again.
    sqlx::query("DELETE FROM daily_intentions").execute(&mut conn).await.unwrap();
    sqlx::query(&format!(
        "ALTER TABLE daily_intentions
         ADD CONSTRAINT {} UNIQUE (user_id, entry_date)",
        schema::INTENTION_UNIQUE_CONSTRAINT
    ))
    .execute(&mut conn)
    .await
    .ok();
    sqlx::query("DELETE FROM schema_migrations WHERE id = $1")
        .bind("0003_drop_intention_unique")
        .execute(&mut conn)
        .await
        .unwrap();

    let insert = "INSERT INTO daily_intentions (user_id, entry_date, content)
                  VALUES ($1, CURRENT_DATE, $2)";
    sqlx::query(insert).bind(user_id).bind("first").execute(&mut conn).await.unwrap();
    let duplicate = sqlx::query(insert).bind(user_id).bind("second").execute(&mut conn).await;
    assert!(duplicate.is_err(), "second same-day intention must violate uniqueness");

    let migration = find_migration("0003_drop_intention_unique").unwrap();
    let outcome = run_migration(&mut conn, migration).await.unwrap();
    assert!(matches!(outcome, MigrationOutcome::Applied(_)));
    assert!(!catalog::constraint_exists(
        &mut conn,
        "daily_intentions",
        schema::INTENTION_UNIQUE_CONSTRAINT
    )
    .await
    .unwrap());

    // Now the same day takes any number of rows.
    sqlx::query(insert).bind(user_id).bind("second").execute(&mut conn).await.unwrap();
    sqlx::query(insert).bind(user_id).bind("third").execute(&mut conn).await.unwrap();

    // Re-running the drop stays green.
    let rerun = run_migration(&mut conn, migration).await.unwrap();
    assert!(matches!(rerun, MigrationOutcome::AlreadyApplied));
    conn.close().await.unwrap();
}

// ── Session store ────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_session_put_get_touch_destroy() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;
    conn.close().await.unwrap();

    let storage = create_storage().await;
    let sid = unique("sid");
    let record = SessionRecord::new(
        sid.clone(),
        serde_json::json!({"user_id": 7, "cookie": {"httpOnly": true}}),
        (Utc::now() + Duration::hours(1)).naive_utc(),
    );

    storage.put_session(&record).await.unwrap();
    let fetched = storage.get_session(&sid).await.unwrap().unwrap();
    assert_eq!(fetched.sess, record.sess);

    // Replacing the payload for the same sid is last-write-wins.
    let replaced = SessionRecord::new(
        sid.clone(),
        serde_json::json!({"user_id": 7, "flash": "saved"}),
        record.expire,
    );
    storage.put_session(&replaced).await.unwrap();
    let fetched = storage.get_session(&sid).await.unwrap().unwrap();
    assert_eq!(fetched.sess["flash"], "saved");

    let later = (Utc::now() + Duration::hours(2)).naive_utc();
    assert!(storage.touch_session(&sid, later).await.unwrap());

    assert!(storage.destroy_session(&sid).await.unwrap());
    assert!(storage.get_session(&sid).await.unwrap().is_none());
    assert!(!storage.destroy_session(&sid).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn pg_expired_sessions_are_invisible_and_swept() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;
    conn.close().await.unwrap();

    let storage = create_storage().await;
    let sid = unique("sid-expired");
    let record = SessionRecord::new(
        sid.clone(),
        serde_json::json!({"user_id": 1}),
        (Utc::now() - Duration::minutes(5)).naive_utc(),
    );
    storage.put_session(&record).await.unwrap();

    // Already-expired rows never come back from get.
    assert!(storage.get_session(&sid).await.unwrap().is_none());

    let swept = storage.delete_expired_sessions().await.unwrap();
    assert!(swept >= 1, "the expired row must be swept");
    assert!(!storage.destroy_session(&sid).await.unwrap(), "sweep already removed it");
}

#[tokio::test]
#[ignore]
async fn pg_rebuild_session_table_restores_the_exact_layout() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;

    // A leftover row proves the rebuild is destructive.
    sqlx::query(r#"INSERT INTO "session" (sid, sess, expire) VALUES ($1, $2, $3)"#)
        .bind(unique("sid-doomed"))
        .bind(serde_json::json!({}))
        .bind((Utc::now() + Duration::hours(1)).naive_utc())
        .execute(&mut conn)
        .await
        .unwrap();

    rebuild_session_table(&mut conn).await.unwrap();

    let columns = catalog::table_columns(&mut conn, "session").await.unwrap();
    assert_eq!(columns, vec!["sid", "sess", "expire"]);
    assert!(catalog::constraint_exists(&mut conn, "session", schema::SESSION_PKEY_NAME)
        .await
        .unwrap());
    assert!(catalog::index_exists(&mut conn, schema::SESSION_EXPIRE_INDEX_NAME).await.unwrap());

    let remaining: i64 =
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM "session""#).fetch_one(&mut conn).await.unwrap();
    assert_eq!(remaining, 0, "rebuild must drop pre-existing rows");
    conn.close().await.unwrap();
}

// ── Sharing resolver ─────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_share_code_resolves_only_while_shared() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;
    conn.close().await.unwrap();

    let storage = create_storage().await;
    let user_id = create_test_user(&storage).await;
    let list = storage.create_list(user_id, "Groceries").await.unwrap();
    storage.add_item(list.id, "Milk", None, None).await.unwrap();
    storage.add_item(list.id, "Bread", Some("whole grain"), Some("bakery")).await.unwrap();
    let done_item = storage.add_item(list.id, "Eggs", None, None).await.unwrap();
    assert!(storage.set_item_done(done_item.id, true).await.unwrap());

    // Not shared yet: the code column is empty and nothing resolves.
    assert!(storage.resolve_share_code("not-a-code").await.unwrap().is_none());

    let code = storage.enable_sharing(list.id).await.unwrap();
    assert_eq!(code.len(), 32);

    let shared = storage.resolve_share_code(&code).await.unwrap().unwrap();
    assert_eq!(shared.name, "Groceries");
    let titles: Vec<_> = shared.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Milk", "Bread", "Eggs"], "items keep insertion order");
    assert!(!shared.items[0].is_done);
    assert_eq!(shared.items[1].note.as_deref(), Some("whole grain"));
    assert_eq!(shared.items[1].tag.as_deref(), Some("bakery"));
    assert!(shared.items[2].is_done);

    // Re-enabling keeps the code stable.
    let again = storage.enable_sharing(list.id).await.unwrap();
    assert_eq!(again, code);

    storage.disable_sharing(list.id).await.unwrap();
    assert!(
        storage.resolve_share_code(&code).await.unwrap().is_none(),
        "an unshared list must look exactly like a wrong code"
    );
}

#[tokio::test]
#[ignore]
async fn pg_sharing_unknown_list_is_not_found() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;
    conn.close().await.unwrap();

    let storage = create_storage().await;
    let missing = storage.enable_sharing(i64::MAX).await;
    assert!(matches!(missing, Err(StorageError::NotFound { entity: "list", .. })));
    let missing = storage.disable_sharing(i64::MAX).await;
    assert!(matches!(missing, Err(StorageError::NotFound { .. })));
}

// ── Waitlist ─────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_waitlist_repeat_signup_is_not_an_error() {
    let mut conn = connect().await;
    ensure_schema(&mut conn).await;
    conn.close().await.unwrap();

    let storage = create_storage().await;
    let email = format!("{}@test.invalid", unique("waitlist"));
    assert!(storage.join_waitlist(&email).await.unwrap());
    assert!(!storage.join_waitlist(&email).await.unwrap());
}
