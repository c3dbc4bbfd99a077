//! Client-wide error types and user-facing messages.
//!
//! Every failure surfaced by the HTTP client core, the auth service and the
//! domain services is a `ClientError`. Backend error bodies are classified
//! into an `ErrorPayload` before they reach the caller.

pub mod payload;

pub use payload::{ErrorPayload, FieldMessages};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while exchanging a refresh token for a new access token.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The session holds no refresh token.
    #[error("No refresh token available")]
    NoRefreshToken,
    /// The refresh endpoint answered with a non-success status.
    #[error("Token refresh rejected with status {status}")]
    Rejected { status: u16, payload: ErrorPayload },
    /// The refresh request never produced a response.
    #[error("Token refresh transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The refresh endpoint answered 2xx without an access token.
    #[error("Token refresh returned a malformed body: {message}")]
    Malformed { message: String },
    /// The refresh task stopped before finishing.
    #[error("Token refresh interrupted: {message}")]
    Interrupted { message: String },
}

/// Errors surfaced to callers of the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Validation error: {}", .0.format_messages())]
    Validation(ErrorPayload),

    /// A 401 that was not recovered by refreshing the session.
    #[error("Unauthorized: {}", .0.format_messages())]
    Unauthorized(ErrorPayload),

    /// The session could not be refreshed and has been cleared.
    #[error("Session expired: {source}")]
    Unauthenticated {
        #[source]
        source: RefreshError,
    },

    #[error("Permission denied: {}", .0.format_messages())]
    Forbidden(ErrorPayload),

    #[error("Not found: {}", .0.format_messages())]
    NotFound(ErrorPayload),

    #[error("Conflict: {}", .0.format_messages())]
    Conflict(ErrorPayload),

    #[error("Payload too large")]
    PayloadTooLarge(ErrorPayload),

    #[error("Unsupported media type")]
    UnsupportedMediaType(ErrorPayload),

    #[error("Rate limited")]
    RateLimited(ErrorPayload),

    #[error("Server error {status}")]
    Server { status: u16, payload: ErrorPayload },

    #[error("Unexpected status {status}: {}", .payload.format_messages())]
    Status { status: u16, payload: ErrorPayload },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// A request rejected before it was sent, e.g. by form validation.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Session storage error: {message}")]
    Storage { message: String },

    #[error("Request cancelled")]
    Cancelled,
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    // Helper constructors for common patterns

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Maps a non-success HTTP status and its body onto the error taxonomy.
    pub fn from_status(status: StatusCode, payload: ErrorPayload) -> Self {
        match status.as_u16() {
            400 => Self::Validation(payload),
            401 => Self::Unauthorized(payload),
            403 => Self::Forbidden(payload),
            404 => Self::NotFound(payload),
            409 => Self::Conflict(payload),
            413 => Self::PayloadTooLarge(payload),
            415 => Self::UnsupportedMediaType(payload),
            429 => Self::RateLimited(payload),
            code if status.is_server_error() => Self::Server {
                status: code,
                payload,
            },
            code => Self::Status {
                status: code,
                payload,
            },
        }
    }

    /// HTTP status behind this error, if it came from a backend response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::PayloadTooLarge(_) => Some(413),
            Self::UnsupportedMediaType(_) => Some(415),
            Self::RateLimited(_) => Some(429),
            Self::Server { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend error body, if any.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Validation(p)
            | Self::Unauthorized(p)
            | Self::Forbidden(p)
            | Self::NotFound(p)
            | Self::Conflict(p)
            | Self::PayloadTooLarge(p)
            | Self::UnsupportedMediaType(p)
            | Self::RateLimited(p) => Some(p),
            Self::Server { payload, .. } | Self::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// True for errors that mean the caller is not (or no longer) logged in.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Unauthenticated { .. })
    }

    /// Message suitable for a toast, banner or inline form error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(payload) => payload.format_messages(),
            Self::Unauthorized(payload) => payload
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| "Authentication required. Please log in.".to_string()),
            Self::Unauthenticated { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            Self::Forbidden(_) => "You do not have permission to perform this action.".to_string(),
            Self::NotFound(_) => "The requested resource was not found.".to_string(),
            Self::Conflict(_) => {
                "This operation conflicts with existing data. Please check for duplicates."
                    .to_string()
            }
            Self::PayloadTooLarge(_) => {
                "File is too large. Please upload a smaller file.".to_string()
            }
            Self::UnsupportedMediaType(_) => {
                "File format not supported. Please upload a valid file.".to_string()
            }
            Self::RateLimited(_) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            Self::Server { status: 500, .. } => "Server error. Please try again later.".to_string(),
            Self::Server {
                status: 502..=504, ..
            } => "Service temporarily unavailable. Please try again later.".to_string(),
            Self::Server { status, payload } | Self::Status { status, payload } => {
                if payload.is_empty() {
                    format!("Error {}: Something went wrong.", status)
                } else {
                    payload.format_messages()
                }
            }
            Self::Network(_) => "Network error. Please check your internet connection.".to_string(),
            Self::InvalidInput { message } => message.clone(),
            Self::Decode { .. } | Self::Storage { .. } => {
                "An unexpected error occurred.".to_string()
            }
            Self::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    (
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Invalid value".to_string()),
                    )
                })
            })
            .collect();
        fields.sort();

        let message = fields
            .into_iter()
            .map(|(field, message)| match field.as_str() {
                "__all__" => message,
                _ => format!("{}: {}", payload::friendly_field_name(&field), message),
            })
            .collect::<Vec<_>>()
            .join("\n");

        ClientError::invalid_input(message)
    }
}
