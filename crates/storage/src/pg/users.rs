//! UserStore implementation for PgStorage.

use async_trait::async_trait;
use sqlx::Row;
use wemanage_core::UserAccount;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::UserStore;

const USER_COLUMNS: &str = "id, email, password_hash, display_name, created_at";

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<UserAccount, StorageError> {
    Ok(UserAccount {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        display_name: row.try_get("display_name")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserStore for PgStorage {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<UserAccount, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, password_hash, display_name)
             VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;
        row_to_user(&row)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }
}
