//! SQLite implementation of the Database trait
//!
//! This module provides a SQLite-based implementation of the Database trait
//! using rusqlite and tokio-rusqlite for async operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::Database;
use crate::error::DbError;
use crate::models::{NewUser, Record, RecordPayload, UserAccount};

/// SQLite database implementation
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Create a new SQLite database connection
    ///
    /// Use `:memory:` for in-memory database or a file path for persistent storage.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path).await?;

        // Run migrations
        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Create a new in-memory database (useful for testing)
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::new(":memory:").await
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: &NewUser) -> Result<UserAccount, DbError> {
        let email = user.email.clone();
        let user_name = user.user_name.clone();
        let password_hash = user.password_hash.clone();

        let result = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO users (email, user_name, password_hash)
                    VALUES (?1, ?2, ?3)
                    "#,
                    rusqlite::params![email, user_name, password_hash],
                )?;

                let id = conn.last_insert_rowid();
                let account = conn.query_row(
                    r#"
                    SELECT id, email, user_name, password_hash, created_at
                    FROM users
                    WHERE id = ?1
                    "#,
                    [id],
                    map_user_row,
                )?;

                Ok(account)
            })
            .await;

        match result {
            Ok(account) => Ok(account),
            Err(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, msg)))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(DbError::ConstraintViolation(
                    msg.unwrap_or_else(|| "unique constraint failed".to_string()),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, DbError> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, email, user_name, password_hash, created_at
                        FROM users
                        WHERE email = ?1
                        "#,
                        [&email],
                        map_user_row,
                    )
                    .optional()?;

                Ok(result)
            })
            .await
            .map_err(Into::into)
    }

    // =========================================================================
    // Record operations
    // =========================================================================

    async fn insert_record(
        &self,
        payload: &RecordPayload,
        created_by: i64,
    ) -> Result<Record, DbError> {
        let name = payload.name.clone();
        let description = payload.description.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO records (name, description, created_by)
                    VALUES (?1, ?2, ?3)
                    "#,
                    rusqlite::params![name, description, created_by],
                )?;

                let id = conn.last_insert_rowid();
                let record = conn.query_row(
                    r#"
                    SELECT id, name, description, created_by, created_at
                    FROM records
                    WHERE id = ?1
                    "#,
                    [id],
                    map_record_row,
                )?;

                Ok(record)
            })
            .await
            .map_err(Into::into)
    }

    async fn list_records(&self) -> Result<Vec<Record>, DbError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, name, description, created_by, created_at
                    FROM records
                    ORDER BY id
                    "#,
                )?;

                let records = stmt
                    .query_map([], map_record_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(records)
            })
            .await
            .map_err(Into::into)
    }

    async fn get_record(&self, id: i64) -> Result<Option<Record>, DbError> {
        self.conn
            .call(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, name, description, created_by, created_at
                        FROM records
                        WHERE id = ?1
                        "#,
                        [id],
                        map_record_row,
                    )
                    .optional()?;

                Ok(result)
            })
            .await
            .map_err(Into::into)
    }

    async fn update_record(&self, id: i64, payload: &RecordPayload) -> Result<Record, DbError> {
        let name = payload.name.clone();
        let description = payload.description.clone();

        let rows_affected = self
            .conn
            .call(move |conn| {
                let count = conn.execute(
                    "UPDATE records SET name = ?1, description = ?2 WHERE id = ?3",
                    rusqlite::params![name, description, id],
                )?;
                Ok(count)
            })
            .await?;

        if rows_affected == 0 {
            return Err(DbError::NotFound);
        }

        self.get_record(id).await?.ok_or(DbError::NotFound)
    }

    async fn delete_record(&self, id: i64) -> Result<(), DbError> {
        let rows_affected = self
            .conn
            .call(move |conn| {
                let count = conn.execute("DELETE FROM records WHERE id = ?1", [id])?;
                Ok(count)
            })
            .await?;

        if rows_affected == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}

/// Map a `users` row to a UserAccount
fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        id: row.get(0)?,
        email: row.get(1)?,
        user_name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(row.get::<_, Option<String>>(4)?).unwrap_or_else(Utc::now),
    })
}

/// Map a `records` row to a Record
fn map_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_by: row.get(3)?,
        created_at: parse_datetime(row.get::<_, Option<String>>(4)?).unwrap_or_else(Utc::now),
    })
}

/// Parse a datetime string from SQLite
fn parse_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                // Try parsing SQLite's datetime format
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|dt| dt.and_utc())
            })
    })
}
