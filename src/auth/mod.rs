//! Authentication system for api-warden
//!
//! This module provides the credential and admission-control core:
//! - Salted password hashing and verification
//! - Signed bearer token issuance and validation
//! - Fixed-window request rate limiting
//! - Registration and login on top of the account store

pub mod jwt;
pub mod password;
pub mod ratelimit;
pub mod service;

pub use jwt::{issue_token, validate_token, TokenError, TokenPayload};
pub use password::{hash_password, verify_password, HashError};
pub use ratelimit::{Admission, RateLimitConfig, RateLimiter};
pub use service::{CredentialConfig, CredentialService};
