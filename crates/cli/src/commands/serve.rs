//! `wemanage serve` — run the HTTP server.

use std::sync::Arc;

use anyhow::Result;
use wemanage_http::{create_router, start_session_sweep, AppState};
use wemanage_mail::Mailer;
use wemanage_objstore::{BucketSpec, ObjectStore};
use wemanage_storage::{DbConfig, PgStorage};

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let config = DbConfig::from_env();
    let store = Arc::new(PgStorage::connect(&config).await?);

    // The server only consumes the schema; lifecycle stays operator-invoked.
    let verification = store.verify_core_tables().await?;
    if !verification.is_complete() {
        tracing::warn!(
            missing = ?verification.missing,
            "core tables missing; run `wemanage init` before taking traffic"
        );
    }

    let mailer = Arc::new(Mailer::from_env()?);
    if !mailer.is_configured() {
        tracing::info!("mailer running in log-only mode");
    }

    // Best-effort: a storage outage must not keep the server down.
    if let Some(objstore) = ObjectStore::from_env()? {
        tokio::spawn(async move {
            if let Err(err) = objstore.ensure_bucket(&BucketSpec::voice_notes()).await {
                tracing::warn!(error = %err, "voice-notes bucket setup failed");
            }
        });
    }

    start_session_sweep(Arc::clone(&store));

    let state = Arc::new(AppState { store, mailer });
    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
