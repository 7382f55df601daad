//! ShareStore implementation for PgStorage.

use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;
use wemanage_core::{List, ListItem, SharedList, SharedListItem, MAX_SHARE_CODE_LEN};

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::ShareStore;

const LIST_COLUMNS: &str = "id, user_id, name, share_code, is_shared, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, list_id, title, is_done, note, tag, created_at";

fn row_to_list(row: &sqlx::postgres::PgRow) -> Result<List, StorageError> {
    Ok(List {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        share_code: row.try_get("share_code")?,
        is_shared: row.try_get("is_shared")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_item(row: &sqlx::postgres::PgRow) -> Result<ListItem, StorageError> {
    Ok(ListItem {
        id: row.try_get("id")?,
        list_id: row.try_get("list_id")?,
        title: row.try_get("title")?,
        is_done: row.try_get("is_done")?,
        note: row.try_get("note")?,
        tag: row.try_get("tag")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ShareStore for PgStorage {
    async fn resolve_share_code(&self, code: &str) -> Result<Option<SharedList>, StorageError> {
        // Cheap pre-filter; generated codes are 32 hex chars.
        if code.is_empty() || code.len() > MAX_SHARE_CODE_LEN {
            return Ok(None);
        }
        let Some(list_row) = sqlx::query(
            "SELECT id, name FROM lists WHERE share_code = $1 AND is_shared = TRUE",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let list_id: i64 = list_row.try_get("id")?;
        let name: String = list_row.try_get("name")?;

        let item_rows = sqlx::query(
            "SELECT title, is_done, note, tag FROM list_items WHERE list_id = $1 ORDER BY id",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;
        let items = item_rows
            .iter()
            .map(|row| {
                Ok(SharedListItem {
                    title: row.try_get("title")?,
                    is_done: row.try_get("is_done")?,
                    note: row.try_get("note")?,
                    tag: row.try_get("tag")?,
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        Ok(Some(SharedList { name, items }))
    }

    async fn create_list(&self, user_id: i64, name: &str) -> Result<List, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO lists (user_id, name) VALUES ($1, $2) RETURNING {LIST_COLUMNS}"
        ))
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        row_to_list(&row)
    }

    async fn add_item(
        &self,
        list_id: i64,
        title: &str,
        note: Option<&str>,
        tag: Option<&str>,
    ) -> Result<ListItem, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO list_items (list_id, title, note, tag)
             VALUES ($1, $2, $3, $4) RETURNING {ITEM_COLUMNS}"
        ))
        .bind(list_id)
        .bind(title)
        .bind(note)
        .bind(tag)
        .fetch_one(&self.pool)
        .await?;
        row_to_item(&row)
    }

    async fn enable_sharing(&self, list_id: i64) -> Result<String, StorageError> {
        let code = Uuid::new_v4().simple().to_string();
        let row = sqlx::query(
            "UPDATE lists
             SET is_shared = TRUE,
                 share_code = COALESCE(share_code, $2),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING share_code",
        )
        .bind(list_id)
        .bind(&code)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row.try_get("share_code")?),
            None => Err(StorageError::NotFound { entity: "list", id: list_id.to_string() }),
        }
    }

    async fn disable_sharing(&self, list_id: i64) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE lists SET is_shared = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(list_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { entity: "list", id: list_id.to_string() });
        }
        Ok(())
    }

    async fn set_item_done(&self, item_id: i64, is_done: bool) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE list_items SET is_done = $2 WHERE id = $1")
            .bind(item_id)
            .bind(is_done)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
