//! User account domain models
//!
//! This module defines the persisted account record and the wire types for
//! registration and login.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account stored in database
///
/// Deliberately not serializable: the password hash must never travel in a
/// response body. Handlers project into `UserResponse` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Unique account ID
    pub id: i64,

    /// Email address, unique across all accounts
    pub email: String,

    /// Display name
    pub user_name: String,

    /// Argon2id hash of the password (PHC string)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Fields needed to persist a new account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Email address
    pub email: String,

    /// Display name
    pub user_name: String,

    /// Already-hashed password
    pub password_hash: String,
}

/// Registration request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address
    pub email: String,

    /// Plaintext password, hashed before it is stored
    pub password: String,

    /// Display name
    pub user_name: String,
}

/// Login request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Plaintext password
    pub password: String,
}

/// Successful login response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Human-readable outcome
    pub message: String,

    /// Signed bearer token for subsequent requests
    pub token: String,
}

/// Wire-visible projection of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// Unique account ID
    pub id: i64,

    /// Email address
    pub email: String,

    /// Display name
    pub user_name: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for UserResponse {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            user_name: account.user_name.clone(),
            created_at: account.created_at,
        }
    }
}
