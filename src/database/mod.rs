//! Database layer for api-warden
//!
//! This module defines the database trait and SQLite implementation.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteDatabase;

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, Record, RecordPayload, UserAccount};

/// Database trait for data persistence
///
/// This trait defines all database operations needed by the application.
/// It uses `async_trait` for async methods and `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Persist a new user account
    ///
    /// Returns the created account. A duplicate email surfaces as
    /// `DbError::ConstraintViolation`.
    async fn create_user(&self, user: &NewUser) -> Result<UserAccount, DbError>;

    /// Look up an account by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, DbError>;

    // =========================================================================
    // Record operations
    // =========================================================================

    /// Insert a record on behalf of a user
    async fn insert_record(
        &self,
        payload: &RecordPayload,
        created_by: i64,
    ) -> Result<Record, DbError>;

    /// Get all records
    async fn list_records(&self) -> Result<Vec<Record>, DbError>;

    /// Get a record by ID
    async fn get_record(&self, id: i64) -> Result<Option<Record>, DbError>;

    /// Update a record's name and description
    ///
    /// Returns the updated record, or `DbError::NotFound` if no such row.
    async fn update_record(&self, id: i64, payload: &RecordPayload) -> Result<Record, DbError>;

    /// Delete a record by ID
    ///
    /// Returns `DbError::NotFound` if no such row.
    async fn delete_record(&self, id: i64) -> Result<(), DbError>;
}
