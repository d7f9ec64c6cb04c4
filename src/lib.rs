//! api-warden - Credential-based authentication and rate limiting for a small record API
//!
//! This crate provides an HTTP service where accounts register with salted
//! password hashes, log in for signed time-bounded bearer tokens, and use
//! those tokens to reach a fixed-window rate-limited record API.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
