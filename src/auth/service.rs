//! Credential service
//!
//! This module owns account registration and login. Password hashing and
//! verification are CPU-bound, so both run on the blocking pool rather than
//! on the async runtime threads.

use std::sync::Arc;
use std::time::Duration;

use crate::database::Database;
use crate::error::{AuthError, DbError};
use crate::models::{LoginRequest, NewUser, RegisterRequest, UserAccount};

use super::jwt::issue_token;
use super::password::{hash_password, verify_password, HashError};

/// Runtime configuration for the credential service
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    /// HMAC secret used to sign and validate tokens
    pub jwt_secret: Vec<u8>,

    /// Lifetime of issued tokens
    pub token_ttl: Duration,
}

/// Account registration and login
///
/// Stores only salted password hashes; plaintext passwords live exactly as
/// long as the request that carried them.
pub struct CredentialService<D: Database> {
    db: Arc<D>,
    config: CredentialConfig,
}

impl<D: Database> CredentialService<D> {
    /// Create a new credential service
    pub fn new(db: Arc<D>, config: CredentialConfig) -> Self {
        Self { db, config }
    }

    /// Signing secret shared with the request middleware
    pub fn jwt_secret(&self) -> &[u8] {
        &self.config.jwt_secret
    }

    /// Register a new account
    ///
    /// The email is checked for uniqueness before the password is hashed, so
    /// a duplicate registration costs no Argon2 work. The unique constraint
    /// on the table still backstops the race where two registrations for the
    /// same email interleave.
    ///
    /// # Arguments
    ///
    /// * `request` - Email, display name and plaintext password
    ///
    /// # Returns
    ///
    /// The stored account row, including its assigned id
    ///
    /// # Errors
    ///
    /// * `AuthError::EmailTaken` - an account with this email already exists
    /// * `AuthError::Hashing` - password hashing failed
    /// * `AuthError::Database` - persistence failure
    pub async fn register(&self, request: RegisterRequest) -> Result<UserAccount, AuthError> {
        if self
            .db
            .find_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::Hashing(HashError::HashFailed(e.to_string())))??;

        let new_user = NewUser {
            email: request.email,
            user_name: request.user_name,
            password_hash,
        };

        match self.db.create_user(&new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Account registered");
                Ok(user)
            }
            Err(DbError::ConstraintViolation(_)) => Err(AuthError::EmailTaken),
            Err(e) => Err(AuthError::Database(e)),
        }
    }

    /// Log an account in and issue a bearer token
    ///
    /// # Arguments
    ///
    /// * `request` - Email and plaintext password
    ///
    /// # Returns
    ///
    /// A signed token valid for the configured TTL
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - no account with this email
    /// * `AuthError::InvalidCredentials` - password does not match
    /// * `AuthError::Token` - token signing failed
    /// * `AuthError::Database` - persistence failure
    pub async fn login(&self, request: LoginRequest) -> Result<String, AuthError> {
        let user = self
            .db
            .find_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password = request.password;
        let password_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| AuthError::Hashing(HashError::HashFailed(e.to_string())))?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let token = issue_token(user.id, self.config.token_ttl, &self.config.jwt_secret)?;
        tracing::info!(user_id = user.id, "Login succeeded");

        Ok(token)
    }
}
