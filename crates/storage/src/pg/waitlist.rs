//! WaitlistStore implementation for PgStorage.

use async_trait::async_trait;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::WaitlistStore;

#[async_trait]
impl WaitlistStore for PgStorage {
    async fn join_waitlist(&self, email: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "INSERT INTO waitlist (email) VALUES ($1) ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
