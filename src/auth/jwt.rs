//! Signed bearer token issuance and validation
//!
//! Tokens are JWTs signed with HMAC-SHA256. A token carries the account id in
//! the `sub` claim and an absolute expiry in `exp`. Validation checks the
//! signature before the expiry and applies no clock-skew leeway, so a token
//! is rejected from the first second past its expiry.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error type for token operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not a structurally valid JWT, uses a different
    /// algorithm, or its claims cannot be read
    #[error("Malformed token")]
    Malformed,

    /// The signature does not match the signing secret
    #[error("Bad signature")]
    BadSignature,

    /// The token was authentic but its expiry has passed
    #[error("Token expired")]
    Expired,

    /// Signing a new token failed
    #[error("Token creation failed: {0}")]
    Creation(String),
}

/// Claims embedded in every issued token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Account id, stringified per RFC 7519
    sub: String,
    /// Expiry as Unix timestamp (seconds)
    exp: i64,
}

/// Contents of a successfully validated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    /// Account id the token was issued to
    pub subject: i64,
    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
}

/// Issue a signed token for an account
///
/// # Arguments
///
/// * `subject` - Account id to embed in the token
/// * `ttl` - How long the token stays valid, measured from now
/// * `secret` - HMAC signing secret
///
/// # Returns
///
/// The signed compact JWT string
///
/// # Errors
///
/// Returns `TokenError::Creation` if signing fails
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use api_warden::auth::jwt::{issue_token, validate_token};
///
/// let secret = b"doc-example-secret";
/// let token = issue_token(7, Duration::from_secs(60), secret).unwrap();
/// let payload = validate_token(&token, secret).unwrap();
/// assert_eq!(payload.subject, 7);
/// ```
pub fn issue_token(subject: i64, ttl: Duration, secret: &[u8]) -> Result<String, TokenError> {
    let claims = Claims {
        sub: subject.to_string(),
        exp: Utc::now().timestamp() + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Creation(e.to_string()))
}

/// Validate a token and extract its payload
///
/// The signature is verified first; an expired forgery therefore reports
/// `BadSignature`, not `Expired`. Expiry is exact, with `leeway` forced to
/// zero (the jsonwebtoken default would tolerate 60 seconds of skew).
///
/// # Arguments
///
/// * `token` - The compact JWT string to validate
/// * `secret` - HMAC signing secret the token must verify against
///
/// # Returns
///
/// The subject and expiry carried by the token
///
/// # Errors
///
/// * `TokenError::BadSignature` - signature does not match `secret`
/// * `TokenError::Expired` - authentic token past its expiry
/// * `TokenError::Malformed` - anything else (structure, algorithm, claims)
pub fn validate_token(token: &str, secret: &[u8]) -> Result<TokenPayload, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp"]);

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(map_jwt_error)?;

    let subject = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| TokenError::Malformed)?;
    let expires_at =
        DateTime::from_timestamp(token_data.claims.exp, 0).ok_or(TokenError::Malformed)?;

    Ok(TokenPayload {
        subject,
        expires_at,
    })
}

/// Maps jsonwebtoken errors to our TokenError type
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
