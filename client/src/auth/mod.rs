//! Authentication for the campus client.
//!
//! This module provides login, registration, logout and current-user
//! resolution on top of the HTTP client core, along with the account
//! operations of the profile screens.

pub mod models;
pub mod service;

// Re-exports for convenience
pub use models::*;
pub use service::AuthService;
