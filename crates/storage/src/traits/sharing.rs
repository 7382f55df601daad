use async_trait::async_trait;
use wemanage_core::{List, ListItem, SharedList};

use crate::error::StorageError;

/// Lists and their public sharing surface.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// Resolve a share code to its read-only projection.
    ///
    /// Returns `Some` only while the list is currently marked shared; a wrong
    /// code and an unshared list are indistinguishable (`None` for both).
    /// Items come back in insertion order. Never mutates.
    async fn resolve_share_code(&self, code: &str) -> Result<Option<SharedList>, StorageError>;

    /// Create a list for a user.
    async fn create_list(&self, user_id: i64, name: &str) -> Result<List, StorageError>;

    /// Append an item to a list.
    async fn add_item(
        &self,
        list_id: i64,
        title: &str,
        note: Option<&str>,
        tag: Option<&str>,
    ) -> Result<ListItem, StorageError>;

    /// Mark a list shared, minting a share code if it never had one. The
    /// code is stable across disable/re-enable so old links keep working.
    async fn enable_sharing(&self, list_id: i64) -> Result<String, StorageError>;

    /// Mark a list not shared. The share code stays on the row, inert.
    async fn disable_sharing(&self, list_id: i64) -> Result<(), StorageError>;

    /// Set an item's done flag. Returns `true` if a row was updated.
    async fn set_item_done(&self, item_id: i64, is_done: bool) -> Result<bool, StorageError>;
}
