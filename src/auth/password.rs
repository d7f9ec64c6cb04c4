//! Password hashing and verification
//!
//! This module provides salted one-way password hashing using Argon2id.
//! Hashes are PHC strings that carry their own salt and parameters.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Hash a password using Argon2id
///
/// Each call generates a fresh random salt, so hashing the same password
/// twice yields two different strings.
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
///
/// # Returns
///
/// The Argon2id hash string (PHC format)
///
/// # Errors
///
/// Returns an error if hashing fails (should not happen in normal operation);
/// there is no fallback to a weaker scheme.
///
/// # Example
///
/// ```
/// use api_warden::auth::password::hash_password;
///
/// let hash = hash_password("hunter2").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashFailed(e.to_string()))
}

/// Verify a password against a stored hash
///
/// Recomputes the digest using the salt embedded in `hash` and compares in
/// constant time. A mismatched password returns `false`; so does a stored
/// hash that cannot be parsed.
///
/// # Arguments
///
/// * `password` - The plaintext password to verify
/// * `hash` - The stored Argon2id hash
///
/// # Returns
///
/// `true` if the password matches the hash, `false` otherwise
///
/// # Example
///
/// ```
/// use api_warden::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("hunter2").unwrap();
/// assert!(verify_password("hunter2", &hash));
/// assert!(!verify_password("wrong", &hash));
/// ```
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Error type for password hashing operations
#[derive(Debug, Clone, PartialEq)]
pub enum HashError {
    /// Hashing failed
    HashFailed(String),
}

impl std::fmt::Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashError::HashFailed(msg) => write!(f, "Hash failed: {}", msg),
        }
    }
}

impl std::error::Error for HashError {}
