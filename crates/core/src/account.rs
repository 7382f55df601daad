use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. `password_hash` never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
