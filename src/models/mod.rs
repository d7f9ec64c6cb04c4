//! Domain models for api-warden
//!
//! This module contains the core domain models used throughout the application.

pub mod record;
pub mod user;

// Re-export commonly used types
pub use record::{Record, RecordPayload};
pub use user::{
    LoginRequest, LoginResponse, NewUser, RegisterRequest, UserAccount, UserResponse,
};
