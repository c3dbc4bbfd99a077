use super::user::UserRef;
use super::{Image, de_decimal, format_price};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Private,
    Shared,
    Apartment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferredGender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
    #[serde(rename = "A")]
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Student,
    Working,
    Other,
}

/// A listing looking for roommates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoommatePost {
    pub id: Uuid,
    pub user: Option<UserRef>,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(deserialize_with = "de_decimal")]
    pub rent: f64,
    pub available_from: NaiveDate,
    /// Months.
    pub lease_duration: u32,
    pub room_type: RoomType,
    pub preferred_gender: PreferredGender,
    pub current_occupants: u32,
    pub total_occupants: u32,
    #[serde(default)]
    pub has_furniture: bool,
    #[serde(default)]
    pub has_parking: bool,
    #[serde(default)]
    pub has_laundry: bool,
    #[serde(default)]
    pub has_kitchen: bool,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub is_pets_allowed: bool,
    #[serde(default)]
    pub is_smoking_allowed: bool,
    pub occupation: Occupation,
    pub university: Option<String>,
    pub contact_number: String,
    pub contact_email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<Image>,
    pub primary_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RoommatePost {
    pub fn open_spots(&self) -> u32 {
        self.total_occupants.saturating_sub(self.current_occupants)
    }

    pub fn display_rent(&self) -> String {
        format!("{}/month", format_price(Some(self.rent)))
    }
}

/// Fields for publishing a roommate listing.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewRoommatePost {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 0.0, message = "Rent cannot be negative"))]
    pub rent: f64,
    pub available_from: NaiveDate,
    #[validate(range(min = 1, message = "Lease duration must be at least one month"))]
    pub lease_duration: u32,
    pub room_type: RoomType,
    pub preferred_gender: PreferredGender,
    pub current_occupants: u32,
    #[validate(range(min = 1, message = "Total occupants must be at least one"))]
    pub total_occupants: u32,
    pub has_furniture: bool,
    pub has_parking: bool,
    pub has_laundry: bool,
    pub has_kitchen: bool,
    pub has_wifi: bool,
    pub is_pets_allowed: bool,
    pub is_smoking_allowed: bool,
    pub occupation: Occupation,
    pub university: Option<String>,
    #[validate(length(min = 1, max = 15, message = "Contact number is required"))]
    pub contact_number: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub contact_email: String,
}

/// Partial update for a listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoommateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_occupants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_occupants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RoommateFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_gender: Option<PreferredGender>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_from_backend() {
        let post: RoommatePost = serde_json::from_value(json!({
            "id": "5f0e8d5c-0c1e-4a7e-9a53-3b1f5b3c7e20",
            "user": 4,
            "title": "Room near north gate",
            "description": "Quiet flat, 5 min walk",
            "location": "North Gate",
            "rent": "6500.00",
            "available_from": "2025-07-01",
            "lease_duration": 11,
            "room_type": "shared",
            "preferred_gender": "A",
            "current_occupants": 1,
            "total_occupants": 3,
            "has_wifi": true,
            "occupation": "student",
            "university": null,
            "contact_number": "9876543210",
            "contact_email": "host@campus.edu",
            "is_active": true,
            "images": [],
            "created_at": "2025-06-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(post.rent, 6500.0);
        assert_eq!(post.preferred_gender, PreferredGender::Any);
        assert_eq!(post.open_spots(), 2);
        assert_eq!(post.display_rent(), "$6500.00/month");
    }
}
