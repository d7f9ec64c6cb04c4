//! HTTP router for api-warden
//!
//! This module defines the axum router that handles all HTTP requests.
//! It provides routes for:
//! - Health checks
//! - Account registration and login
//! - The protected record API
//!
//! Every route sits behind the rate limiter; the record routes additionally
//! require a valid bearer token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{CredentialService, RateLimiter};
use crate::database::Database;
use crate::error::ApiError;
use crate::models::{
    LoginRequest, LoginResponse, Record, RecordPayload, RegisterRequest, UserResponse,
};
use crate::server::middleware::{auth_middleware, rate_limit_middleware, AuthenticatedUser};

/// Shared application state
pub struct AppState<D: Database> {
    /// Credential service
    pub credentials: Arc<CredentialService<D>>,

    /// Database
    pub database: Arc<D>,

    /// Request rate limiter
    pub rate_limiter: Arc<RateLimiter>,
}

impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            credentials: Arc::clone(&self.credentials),
            database: Arc::clone(&self.database),
            rate_limiter: Arc::clone(&self.rate_limiter),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the main application router
///
/// # Arguments
///
/// * `state` - Application state containing the services and the limiter
///
/// # Returns
///
/// An axum Router configured with all endpoints
pub fn build_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let records = Router::new()
        .route("/records", get(list_records_handler::<D>))
        .route("/records", post(create_record_handler::<D>))
        .route("/records/:id", get(get_record_handler::<D>))
        .route("/records/:id", put(update_record_handler::<D>))
        .route("/records/:id", delete(delete_record_handler::<D>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.credentials),
            auth_middleware::<D>,
        ));

    Router::new()
        // Health endpoint (no auth required)
        .route("/health", get(health_handler))
        // Account endpoints (no auth required)
        .route("/register", post(register_handler::<D>))
        .route("/login", post(login_handler::<D>))
        // Record endpoints (bearer token required)
        .merge(records)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.rate_limiter),
            rate_limit_middleware,
        ))
        .with_state(state)
}

// =============================================================================
// Health Handler
// =============================================================================

/// Health check endpoint handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Account Handlers
// =============================================================================

/// Register a new account
async fn register_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_registration(&request)?;

    let user = state.credentials.register(request).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Log in and receive a bearer token
async fn login_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.credentials.login(request).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Check a registration payload before any hashing or database work
fn validate_registration(request: &RegisterRequest) -> Result<(), ApiError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(ApiError::Validation(
            "Password must not be empty".to_string(),
        ));
    }
    if request.user_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "User name must not be empty".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Record Handlers
// =============================================================================

/// List all records
async fn list_records_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.database.list_records().await?;
    Ok(Json(records))
}

/// Create a record owned by the authenticated account
async fn create_record_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<RecordPayload>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    validate_record(&payload)?;

    let record = state.database.insert_record(&payload, user.0).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch a single record by id
async fn get_record_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> Result<Json<Record>, ApiError> {
    let record = state
        .database
        .get_record(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Record not found".to_string()))?;

    Ok(Json(record))
}

/// Replace a record's payload
async fn update_record_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
    Json(payload): Json<RecordPayload>,
) -> Result<Json<Record>, ApiError> {
    validate_record(&payload)?;

    let record = state.database.update_record(id, &payload).await?;
    Ok(Json(record))
}

/// Delete a record
async fn delete_record_handler<D: Database + 'static>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.database.delete_record(id).await?;
    Ok(Json(serde_json::json!({ "message": "Record deleted" })))
}

/// Check a record payload
fn validate_record(payload: &RecordPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Record name must not be empty".to_string(),
        ));
    }
    Ok(())
}
