//! Classification of backend error bodies.
//!
//! The backend reports failures in several shapes: a `detail` string, a
//! `non_field_errors` list, an object keyed by field name, a bare list of
//! messages or a plain string. `ErrorPayload::parse` sorts a body into one
//! of these kinds once, so formatting never has to probe the JSON again.

use serde_json::Value;

/// Key the backend uses for errors that are not tied to a single field.
const NON_FIELD_KEY: &str = "non_field_errors";

/// Messages reported against one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMessages {
    /// Field name as sent by the backend; nested fields use `parent.child`.
    pub field: String,
    pub messages: Vec<String>,
}

/// A parsed error body.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// No body, or `null`.
    Empty,
    /// `{"detail": "..."}`
    Detail(String),
    /// `{"non_field_errors": [...]}` or a top-level list of messages.
    NonField(Vec<String>),
    /// Field-keyed validation errors, possibly with non-field messages.
    FieldErrors {
        non_field: Vec<String>,
        fields: Vec<FieldMessages>,
    },
    /// A bare string body.
    Message(String),
    /// Anything else, kept verbatim.
    Unknown(Value),
}

impl ErrorPayload {
    /// Parses a raw response body.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return ErrorPayload::Empty;
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::parse(value),
            Err(_) => ErrorPayload::Message(String::from_utf8_lossy(body).trim().to_string()),
        }
    }

    /// Classifies an already-decoded JSON body.
    pub fn parse(value: Value) -> Self {
        match value {
            Value::Null => ErrorPayload::Empty,
            Value::String(message) => ErrorPayload::Message(message),
            Value::Array(_) => {
                let messages = messages_from(&value);
                if messages.is_empty() {
                    ErrorPayload::Unknown(value)
                } else {
                    ErrorPayload::NonField(messages)
                }
            }
            Value::Object(ref map) => {
                if let Some(Value::String(detail)) = map.get("detail") {
                    return ErrorPayload::Detail(detail.clone());
                }

                let non_field = map.get(NON_FIELD_KEY).map(messages_from).unwrap_or_default();

                let mut fields = Vec::new();
                for (field, messages) in map.iter().filter(|(k, _)| k.as_str() != NON_FIELD_KEY) {
                    collect_field(field, messages, &mut fields);
                }

                match (non_field.is_empty(), fields.is_empty()) {
                    (true, true) => ErrorPayload::Unknown(value),
                    (false, true) => ErrorPayload::NonField(non_field),
                    _ => ErrorPayload::FieldErrors { non_field, fields },
                }
            }
            other => ErrorPayload::Unknown(other),
        }
    }

    /// The `detail` message, if the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ErrorPayload::Detail(detail) => Some(detail),
            _ => None,
        }
    }

    /// Messages reported against `field`.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        match self {
            ErrorPayload::FieldErrors { fields, .. } => fields
                .iter()
                .find(|f| f.field == field)
                .map(|f| f.messages.as_slice()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ErrorPayload::Empty)
    }

    /// Renders the payload as newline-separated, human-readable lines.
    pub fn format_messages(&self) -> String {
        match self {
            ErrorPayload::Empty => "An error occurred".to_string(),
            ErrorPayload::Detail(detail) => detail.clone(),
            ErrorPayload::Message(message) => message.clone(),
            ErrorPayload::NonField(messages) => messages.join("\n"),
            ErrorPayload::FieldErrors { non_field, fields } => {
                let mut lines: Vec<String> = non_field.clone();
                for entry in fields {
                    let label = friendly_field_name(&entry.field);
                    lines.extend(entry.messages.iter().map(|m| format!("{}: {}", label, m)));
                }

                if lines.is_empty() {
                    "Validation failed".to_string()
                } else {
                    lines.join("\n")
                }
            }
            ErrorPayload::Unknown(Value::Object(_)) => "Validation failed".to_string(),
            ErrorPayload::Unknown(_) => "An error occurred".to_string(),
        }
    }
}

fn collect_field(field: &str, value: &Value, out: &mut Vec<FieldMessages>) {
    match value {
        Value::Object(nested) => {
            for (sub, sub_value) in nested {
                collect_field(&format!("{}.{}", field, sub), sub_value, out);
            }
        }
        Value::Array(items) if items.iter().any(Value::is_object) => {
            for (index, item) in items.iter().enumerate() {
                if item.is_object() {
                    collect_field(&format!("{}[{}]", field, index), item, out);
                }
            }
        }
        other => {
            let messages = messages_from(other);
            if !messages.is_empty() {
                out.push(FieldMessages {
                    field: field.to_string(),
                    messages,
                });
            }
        }
    }
}

fn messages_from(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(message) => Some(message.clone()),
                Value::Null | Value::Object(_) | Value::Array(_) => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// Maps backend field names to the labels shown in forms.
pub fn friendly_field_name(field: &str) -> String {
    let label = match field {
        "image" => "Image",
        "title" => "Title",
        "author" => "Author",
        "isbn" => "ISBN",
        "edition" => "Edition",
        "price" => "Price",
        "description" => "Description",
        "department" => "Department",
        "contact_email" => "Contact Email",
        "contact_phone" => "Contact Phone",
        "condition" => "Condition",
        "email" => "Email",
        "password" => "Password",
        "password2" => "Confirm Password",
        "name" => "Name",
        "mobile" => "Mobile Number",
        "address" => "Address",
        "category" => "Category",
        "location" => "Location",
        "date_lost" => "Date Lost",
        "date_found" => "Date Found",
        _ => return field.replacen('_', " ", 1).to_uppercase(),
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_payload() {
        let payload = ErrorPayload::parse(json!({
            "detail": "No active account found with the given credentials"
        }));
        assert_eq!(
            payload.detail(),
            Some("No active account found with the given credentials")
        );
        assert_eq!(
            payload.format_messages(),
            "No active account found with the given credentials"
        );
    }

    #[test]
    fn test_field_errors_use_friendly_names() {
        let payload = ErrorPayload::parse(json!({
            "isbn": ["book post with this ISBN already exists."],
            "contact_email": ["Enter a valid email address."],
            "non_field_errors": ["This book is no longer available."]
        }));

        assert_eq!(
            payload.field("isbn"),
            Some(&["book post with this ISBN already exists.".to_string()][..])
        );
        assert_eq!(
            payload.format_messages(),
            "This book is no longer available.\n\
             Contact Email: Enter a valid email address.\n\
             ISBN: book post with this ISBN already exists."
        );
    }

    #[test]
    fn test_unknown_field_falls_back_to_upper_case() {
        assert_eq!(friendly_field_name("course_code"), "COURSE CODE");
        assert_eq!(friendly_field_name("start_date_time"), "START DATE_TIME");
        assert_eq!(friendly_field_name("password2"), "Confirm Password");
    }

    #[test]
    fn test_non_field_only() {
        let payload = ErrorPayload::parse(json!({
            "non_field_errors": ["You have already requested this book."]
        }));
        assert_eq!(
            payload,
            ErrorPayload::NonField(vec!["You have already requested this book.".to_string()])
        );

        let payload = ErrorPayload::parse(json!(["Event is full."]));
        assert_eq!(payload.format_messages(), "Event is full.");
    }

    #[test]
    fn test_nested_field_errors() {
        let payload = ErrorPayload::parse(json!({
            "profile": {"student_id": ["This field may not be blank."]},
            "images": [{}, {"image": ["Upload a valid image."]}]
        }));

        match &payload {
            ErrorPayload::FieldErrors { fields, .. } => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["images[1].image", "profile.student_id"]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_body_shapes() {
        assert_eq!(ErrorPayload::from_body(b""), ErrorPayload::Empty);
        assert_eq!(ErrorPayload::from_body(b" \n"), ErrorPayload::Empty);
        assert_eq!(
            ErrorPayload::from_body(b"Bad Gateway"),
            ErrorPayload::Message("Bad Gateway".to_string())
        );
        assert_eq!(
            ErrorPayload::from_body(br#""Something broke""#),
            ErrorPayload::Message("Something broke".to_string())
        );
        assert_eq!(
            ErrorPayload::from_body(b"{}").format_messages(),
            "Validation failed"
        );
        assert_eq!(ErrorPayload::Empty.format_messages(), "An error occurred");
    }
}
