use super::user::User;
use super::{Image, de_opt_decimal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookCondition {
    New,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sell,
    Donate,
    Exchange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl BookCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::New => "new",
            BookCondition::Good => "good",
            BookCondition::Fair => "fair",
            BookCondition::Poor => "poor",
        }
    }
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sell => "sell",
            TransactionType::Donate => "donate",
            TransactionType::Exchange => "exchange",
        }
    }
}

/// A textbook listed in the book bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub condition: BookCondition,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    pub price: Option<f64>,
    pub transaction_type: TransactionType,
    pub department: String,
    pub course_code: Option<String>,
    pub posted_by: Option<User>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub images: Vec<Image>,
    pub primary_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Only books offered for sale carry a meaningful price.
    pub fn display_price(&self) -> String {
        match self.transaction_type {
            TransactionType::Sell => super::format_price(self.price),
            TransactionType::Donate => "Free".to_string(),
            TransactionType::Exchange => "Exchange".to_string(),
        }
    }
}

/// A request from one student to take another student's book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRequest {
    pub id: Uuid,
    pub book: Uuid,
    pub requested_by: Option<User>,
    pub message: Option<String>,
    pub status: BookRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for listing a new book.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Author is required"))]
    pub author: String,
    #[validate(length(max = 13, message = "ISBN must be at most 13 characters"))]
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub condition: BookCondition,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub transaction_type: TransactionType,
    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,
    pub course_code: Option<String>,
    #[validate(email(message = "Enter a valid email address"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Partial update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub condition: Option<BookCondition>,
    pub price: Option<f64>,
    pub transaction_type: Option<TransactionType>,
    pub department: Option<String>,
    pub course_code: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Query parameters accepted by the book list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<BookCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

fn default_true() -> bool {
    true
}
