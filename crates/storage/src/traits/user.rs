use async_trait::async_trait;
use wemanage_core::UserAccount;

use crate::error::StorageError;

/// Account rows. Password hashing happens above this layer; the store only
/// ever sees the hash.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account. A taken email surfaces as
    /// [`StorageError::Duplicate`].
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<UserAccount, StorageError>;

    /// Look up an account by email.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError>;
}
