//! Pre-launch waitlist signup.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use wemanage_core::MAX_EMAIL_LEN;
use wemanage_storage::WaitlistStore;

use crate::api_error::ApiError;
use crate::response_types::WaitlistResponse;
use crate::AppState;

#[derive(Deserialize)]
pub struct WaitlistRequest {
    pub email: String,
}

/// `POST /api/waitlist`
///
/// Inserts the email and spawns a best-effort confirmation mail. A repeat
/// signup answers `already_joined`; the mail send never blocks or fails the
/// request.
pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WaitlistRequest>,
) -> Result<Json<WaitlistResponse>, ApiError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || !email.contains('@') {
        return Err(ApiError::BadRequest("invalid email address".to_owned()));
    }

    let newly_joined = state.store.join_waitlist(&email).await?;
    if newly_joined {
        let mailer = Arc::clone(&state.mailer);
        tokio::spawn(async move {
            let html = "<p>Thanks for joining the WeManageAll waitlist. \
                        We will let you know the moment your workspace is ready.</p>";
            if let Err(err) = mailer.send_html(&email, "You're on the list", html).await {
                tracing::warn!(error = %err, "waitlist confirmation mail failed");
            }
        });
    }

    Ok(Json(WaitlistResponse {
        status: if newly_joined { "joined" } else { "already_joined" },
    }))
}
