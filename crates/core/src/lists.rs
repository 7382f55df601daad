use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-owned list (shopping, packing, reading, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Opaque code under which the list can be read publicly.
    /// Stable across disable/re-enable so shared links keep working.
    pub share_code: Option<String>,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of a list. The serial `id` doubles as insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    pub is_done: bool,
    pub note: Option<String>,
    pub tag: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read-only projection of a shared list, served to anonymous visitors.
/// Carries no ids, no owner and no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedList {
    pub name: String,
    pub items: Vec<SharedListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedListItem {
    pub title: String,
    pub is_done: bool,
    pub note: Option<String>,
    pub tag: Option<String>,
}
