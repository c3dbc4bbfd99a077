//! Rust structs that mirror the backend's JSON resources.
//!
//! These are pass-through DTOs: the backend owns validation and lifecycle,
//! the client only holds transient copies while a view needs them. Helpers
//! here smooth over wire quirks (decimal strings, paginated vs. bare lists).

pub mod book;
pub mod event;
pub mod lost_found;
pub mod roommate;
pub mod user;

pub use book::*;
pub use event::*;
pub use lost_found::*;
pub use roommate::*;
pub use user::*;

use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by list endpoints, with or without pagination.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated {
        count: u64,
        next: Option<String>,
        previous: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Flattens either shape into the list of items.
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results, .. } => results,
            ListResponse::Plain(items) => items,
        }
    }

    /// Total number of items across pages, when the backend reports it.
    pub fn total(&self) -> usize {
        match self {
            ListResponse::Paginated { count, .. } => *count as usize,
            ListResponse::Plain(items) => items.len(),
        }
    }
}

/// An attached image as serialized by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: Value,
    pub image: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    pub uploaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Plain status acknowledgement, e.g. `{"status": "event approved"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusMessage {
    #[serde(alias = "message")]
    pub status: String,
}

/// Formats a price for display; absent or zero prices read as "Free".
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(amount) if amount > 0.0 => format!("${:.2}", amount),
        _ => "Free".to_string(),
    }
}

/// Accepts decimals serialized as strings (`"12.50"`), numbers or null.
pub(crate) fn de_opt_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| DeError::custom(format!("Invalid decimal '{}': {}", s, e))),
        Some(other) => Err(DeError::custom(format!("Invalid decimal: {}", other))),
    }
}

/// Like `de_opt_decimal` for fields the backend always populates.
pub(crate) fn de_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    de_opt_decimal(deserializer).map(|value| value.unwrap_or_default())
}
