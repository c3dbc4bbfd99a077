use super::user::UserRef;
use super::{Image, de_decimal, format_price};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Workshop,
    Seminar,
    Conference,
    Social,
    Sports,
    Cultural,
    Other,
}

/// A noticeboard event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub location_url: Option<String>,
    pub organizer: Option<UserRef>,
    #[serde(default)]
    pub is_online: bool,
    pub meeting_link: Option<String>,
    pub max_participants: Option<u32>,
    #[serde(default = "default_true")]
    pub is_free: bool,
    #[serde(default, deserialize_with = "de_decimal")]
    pub price: f64,
    #[serde(default)]
    pub registration_required: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(alias = "registration_count")]
    pub registrations_count: Option<u32>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub primary_image: Option<String>,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_datetime > now
    }

    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start_datetime <= now && now <= self.end_datetime
    }

    /// Whether registration is still possible at `now`, as far as the client
    /// can tell from the listing.
    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        if !self.registration_required {
            return true;
        }
        if self.registration_deadline.is_some_and(|deadline| deadline < now) {
            return false;
        }
        match (self.max_participants, self.registrations_count) {
            (Some(max), Some(count)) => count < max,
            _ => true,
        }
    }

    pub fn display_price(&self) -> String {
        if self.is_free {
            "Free".to_string()
        } else {
            format_price(Some(self.price))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventComment {
    pub id: Uuid,
    pub event: Option<Uuid>,
    pub user: Option<UserRef>,
    pub user_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: Uuid,
    pub event: Option<Uuid>,
    pub user: Option<UserRef>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub attended: bool,
    pub notes: Option<String>,
}

/// Per-event numbers shown on the admin detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStatistics {
    pub total_registrations: u32,
    pub attended_registrations: u32,
    pub attendance_rate: f64,
    pub comments_count: u32,
    pub images_count: u32,
}

/// Fields for creating or replacing an event.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_event_window"))]
pub struct NewEvent {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub event_type: EventType,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,
    #[validate(url(message = "Enter a valid URL"))]
    pub location_url: Option<String>,
    pub is_online: bool,
    #[validate(url(message = "Enter a valid URL"))]
    pub meeting_link: Option<String>,
    pub max_participants: Option<u32>,
    pub is_free: bool,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    pub registration_required: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
}

fn validate_event_window(event: &NewEvent) -> Result<(), ValidationError> {
    if event.end_datetime < event.start_datetime {
        let mut error = ValidationError::new("event_window");
        error.message = Some("End time must be after the start time".into());
        return Err(error);
    }
    Ok(())
}

/// Query parameters accepted by the event list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_upcoming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_past: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Query parameters of the admin event list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminEventFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

fn default_true() -> bool {
    true
}
