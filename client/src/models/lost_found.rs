use super::user::UserRef;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Lost,
    Found,
}

/// A lost or found item report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostFoundItem {
    pub id: Uuid,
    pub item_name: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub location: Option<String>,
    pub date_reported: DateTime<Utc>,
    pub date_occurred: Option<DateTime<Utc>>,
    pub reporter: Option<UserRef>,
    pub claimed_by: Option<UserRef>,
    #[serde(default)]
    pub is_resolved: bool,
    pub image: Option<String>,
    pub contact_info: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
}

impl LostFoundItem {
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

/// Fields for reporting a new item.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewLostFoundItem {
    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub item_name: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: Option<String>,
    pub date_occurred: Option<DateTime<Utc>>,
    pub contact_info: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LostFoundUpdate {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    pub location: Option<String>,
    pub date_occurred: Option<DateTime<Utc>>,
    pub contact_info: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub is_resolved: Option<bool>,
}

impl LostFoundUpdate {
    /// Pins `date_occurred` to noon UTC so the calendar date survives any
    /// timezone conversion on the way back.
    pub fn normalized(mut self) -> Self {
        self.date_occurred = self
            .date_occurred
            .map(|date| date.date_naive().and_time(noon()).and_utc());
        self
    }
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// Query parameters accepted by the item list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LostFoundFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
