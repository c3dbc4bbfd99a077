use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Account as returned by the profile endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Value,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// Student-specific profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
}

impl User {
    /// Staff and superusers may use the admin screens.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }

    /// The id rendered as a string, whatever JSON type the backend used.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        }
    }

    pub fn department(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.department.as_deref())
    }

    pub fn student_id(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.student_id.as_deref())
    }
}

/// Minimal user reference embedded in other resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(Uuid),
    Key(i64),
    User(Box<User>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_roles_and_profile() {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "email": "a@b.com",
            "name": "Asha",
            "is_staff": true,
            "profile": {"department": "CSE", "student_id": "21CS042"},
            "date_joined": "2024-08-01T10:00:00Z"
        }))
        .unwrap();

        assert!(user.is_admin());
        assert_eq!(user.id_string(), "7");
        assert_eq!(user.department(), Some("CSE"));
        assert_eq!(user.student_id(), Some("21CS042"));
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_value(json!({
            "id": "a3a4c2b0-2f59-4ad4-9d0b-2c7c36a4f7f1",
            "email": "a@b.com"
        }))
        .unwrap();

        assert!(!user.is_admin());
        assert_eq!(user.id_string(), "a3a4c2b0-2f59-4ad4-9d0b-2c7c36a4f7f1");
        assert_eq!(user.department(), None);
    }
}
