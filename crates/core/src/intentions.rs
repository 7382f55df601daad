use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A short intention written for one day.
///
/// Historically limited to one per `(user_id, entry_date)`; that constraint
/// is dropped by the `remove-intention-constraint` migration, after which a
/// day can hold any number of intentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyIntention {
    pub id: i64,
    pub user_id: i64,
    pub entry_date: NaiveDate,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
