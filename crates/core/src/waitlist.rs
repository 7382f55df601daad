use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One signup on the pre-launch waitlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
