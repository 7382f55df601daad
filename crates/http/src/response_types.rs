//! Response bodies for the small fixed endpoints.

use serde::Serialize;

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

/// Answer to a waitlist signup. A repeat signup is reported, not rejected.
#[derive(Serialize)]
pub struct WaitlistResponse {
    pub status: &'static str,
}
