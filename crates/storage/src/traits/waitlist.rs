use async_trait::async_trait;

use crate::error::StorageError;

/// The pre-launch waitlist.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Add an email to the waitlist. Returns `true` if it was new, `false`
    /// if it was already on the list; a repeat signup is not an error.
    async fn join_waitlist(&self, email: &str) -> Result<bool, StorageError>;
}
