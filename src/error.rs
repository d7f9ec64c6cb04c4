//! Application error types for api-warden
//!
//! This module defines the domain error types and the single boundary
//! (`ApiError`) that maps each of them to an HTTP response. All error types
//! use `thiserror`; handlers and middleware return `Result<_, ApiError>` so
//! the status-code mapping happens exactly once.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::time::Duration;
use thiserror::Error;

use crate::auth::jwt::TokenError;
use crate::auth::password::HashError;

/// Authentication and account errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration attempted with an email that already has an account
    #[error("Email already registered")]
    EmailTaken,

    /// Login attempted with an email that has no account
    #[error("User not found")]
    UserNotFound,

    /// Login attempted with a password that does not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed
    #[error("Hashing error: {0}")]
    Hashing(#[from] HashError),

    /// Token issuance failed
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Persistence failure
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Async connection failure (closed or poisoned channel)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row not found
    #[error("Not found")]
    NotFound,

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<tokio_rusqlite::Error> for DbError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => DbError::Sqlite(e),
            other => DbError::Connection(other.to_string()),
        }
    }
}

/// Request-boundary error type
///
/// Every variant corresponds to one HTTP status class. Domain errors convert
/// into this type via `From` impls; `IntoResponse` renders the uniform
/// `{"error": msg}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// User-correctable input problem (duplicate email, bad payload)
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed, forged or expired bearer token. One variant for
    /// all token failures so the response cannot act as an oracle.
    #[error("Invalid or missing token")]
    Unauthenticated,

    /// Login password mismatch
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Requested entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Client exceeded the request budget for the current window
    #[error("Too many requests")]
    RateLimited { retry_after: Duration },

    /// Unexpected failure; detail is logged server-side, the client sees a
    /// generic message
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Whole seconds until retry, rounded up so a client honoring the hint lands
/// past the window boundary
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::RateLimited { retry_after } => {
                let secs = retry_after_secs(retry_after);
                let body = Json(serde_json::json!({
                    "error": "Too many requests",
                    "retry_after_secs": secs,
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal server error");
                let body = Json(serde_json::json!({ "error": "Internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            other => {
                let status = other.status();
                let body = Json(serde_json::json!({ "error": other.to_string() }));
                (status, body).into_response()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::Validation("Email already registered".to_string()),
            AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Hashing(e) => ApiError::Internal(format!("password hashing failed: {e}")),
            AuthError::Token(e) => ApiError::Internal(format!("token issuance failed: {e}")),
            AuthError::Database(e) => ApiError::Internal(format!("database failure: {e}")),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ApiError::NotFound("Record not found".to_string()),
            other => ApiError::Internal(format!("database failure: {other}")),
        }
    }
}
