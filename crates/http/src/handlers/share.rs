//! Anonymous read-only view of a shared list.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use wemanage_core::SharedList;
use wemanage_storage::ShareStore;

use crate::api_error::ApiError;
use crate::AppState;

/// `GET /share/{code}`
///
/// A wrong code, an unshared list and an internal storage failure all
/// collapse to the same 404: an anonymous caller can neither enumerate
/// valid-but-unshared codes nor read database error detail. Failures are
/// still logged server-side.
pub async fn get_shared_list(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<SharedList>, ApiError> {
    match state.store.resolve_share_code(&code).await {
        Ok(Some(shared)) => Ok(Json(shared)),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            tracing::warn!(error = %err, "share resolution failed, answering not-found");
            Err(ApiError::NotFound)
        },
    }
}
