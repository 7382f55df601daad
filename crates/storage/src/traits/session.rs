use async_trait::async_trait;
use chrono::NaiveDateTime;
use wemanage_core::SessionRecord;

use crate::error::StorageError;

/// Web-session row lifecycle: absent → active → refreshed* → expired/deleted.
///
/// Concurrent writes for the same sid (retried or duplicate requests) are
/// last-write-wins; a browser session is single-writer in practice.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a session by id. Expired rows are invisible even before the
    /// sweep removes them.
    async fn get_session(&self, sid: &str) -> Result<Option<SessionRecord>, StorageError>;

    /// Save or replace a session.
    async fn put_session(&self, record: &SessionRecord) -> Result<(), StorageError>;

    /// Refresh the expiry of a live session (sliding expiry). Returns `true`
    /// if a row was updated.
    async fn touch_session(&self, sid: &str, expire: NaiveDateTime)
        -> Result<bool, StorageError>;

    /// Delete a session (logout). Returns `true` if a row was deleted.
    async fn destroy_session(&self, sid: &str) -> Result<bool, StorageError>;

    /// Delete every expired session; returns how many went. Keyed on the
    /// expire index.
    async fn delete_expired_sessions(&self) -> Result<u64, StorageError>;
}
