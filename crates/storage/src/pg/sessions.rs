//! SessionStore implementation for PgStorage.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::Row;
use wemanage_core::SessionRecord;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::SessionStore;

fn row_to_session(row: &sqlx::postgres::PgRow) -> Result<SessionRecord, StorageError> {
    Ok(SessionRecord {
        sid: row.try_get("sid")?,
        sess: row.try_get("sess")?,
        expire: row.try_get("expire")?,
    })
}

#[async_trait]
impl SessionStore for PgStorage {
    async fn get_session(&self, sid: &str) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(
            r#"SELECT sid, sess, expire FROM "session" WHERE sid = $1 AND expire > $2"#,
        )
        .bind(sid)
        .bind(Utc::now().naive_utc())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn put_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        sqlx::query(
            r#"INSERT INTO "session" (sid, sess, expire)
               VALUES ($1, $2, $3)
               ON CONFLICT (sid) DO UPDATE SET
                 sess = EXCLUDED.sess,
                 expire = EXCLUDED.expire"#,
        )
        .bind(&record.sid)
        .bind(&record.sess)
        .bind(record.expire)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn touch_session(
        &self,
        sid: &str,
        expire: NaiveDateTime,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(r#"UPDATE "session" SET expire = $2 WHERE sid = $1"#)
            .bind(sid)
            .bind(expire)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn destroy_session(&self, sid: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(r#"DELETE FROM "session" WHERE sid = $1"#)
            .bind(sid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(&self) -> Result<u64, StorageError> {
        let result = sqlx::query(r#"DELETE FROM "session" WHERE expire <= $1"#)
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
