//! Client core for the CampusConnect campus community platform.
//!
//! The crate wraps the backend's REST API in an authenticated session with
//! transparent token refresh, an auth service and typed domain services for
//! the book bank, lost and found, roommate listings and the noticeboard.

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod models;
pub mod services;
pub mod session;

pub use auth::{AuthService, AuthState};
pub use config::Config;
pub use errors::{ClientError, ClientResult, ErrorPayload, RefreshError};
pub use http::{ApiClient, AuthMode, FormData, Navigator, RequestDescriptor, Route, Upload};
pub use session::{FileSessionStore, MemorySessionStore, SessionState, SessionStore};
