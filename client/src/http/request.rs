//! Immutable description of one API call.
//!
//! A descriptor is built once and then only read: the client core rebuilds
//! the outgoing HTTP request from it for every attempt, so retrying after a
//! token refresh never depends on state left behind by the first attempt.

use crate::errors::{ClientError, ClientResult};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

/// Which credential, if any, accompanies the request.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Attach the session's access token when one exists.
    #[default]
    Session,
    /// Never attach a credential.
    Anonymous,
    /// Attach this token instead of the session's.
    Bearer(String),
}

impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Session => write!(f, "Session"),
            AuthMode::Anonymous => write!(f, "Anonymous"),
            AuthMode::Bearer(_) => write!(f, "Bearer(<redacted>)"),
        }
    }
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, upload: Upload },
}

/// Multipart fields, kept as data so the body can be rebuilt per attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a serializable struct into text fields.
    ///
    /// Nulls are skipped, lists become `name[i]` and nested objects
    /// `name.field`, matching what the backend's form parser expects.
    pub fn from_fields<T: Serialize>(fields: &T) -> ClientResult<Self> {
        let value = serde_json::to_value(fields)
            .map_err(|e| ClientError::invalid_input(format!("Unencodable form: {}", e)))?;

        let Value::Object(map) = value else {
            return Err(ClientError::invalid_input("Form fields must be an object"));
        };

        let mut form = Self::new();
        for (name, value) in map {
            form.push_value(name, value);
        }
        Ok(form)
    }

    fn push_value(&mut self, name: String, value: Value) {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    self.push_value(format!("{}[{}]", name, index), item);
                }
            }
            Value::Object(map) => {
                for (field, item) in map {
                    self.push_value(format!("{}.{}", name, field), item);
                }
            }
            Value::String(text) => self.parts.push(FormPart::Text { name, value: text }),
            other => self.parts.push(FormPart::Text {
                name,
                value: other.to_string(),
            }),
        }
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, upload: Upload) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            upload,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Builds a fresh multipart body.
    pub(crate) fn to_multipart(&self) -> ClientResult<Form> {
        let mut form = Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File { name, upload } => {
                    let mut file =
                        Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
                    if let Some(mime) = &upload.mime_type {
                        file = file.mime_str(mime).map_err(|e| {
                            ClientError::invalid_input(format!(
                                "Invalid MIME type '{}': {}",
                                mime, e
                            ))
                        })?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(FormData),
}

/// Method, path, query, body and credential mode of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    auth: AuthMode,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            auth: AuthMode::Session,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Adds query parameters from a serializable filter; `None` fields are
    /// left out.
    pub fn query<T: Serialize>(mut self, params: &T) -> ClientResult<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| ClientError::invalid_input(format!("Unencodable query: {}", e)))?;

        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::Null => {}
                        Value::String(text) => self.query.push((key, text)),
                        other => self.query.push((key, other.to_string())),
                    }
                }
            }
            _ => return Err(ClientError::invalid_input("Query parameters must be an object")),
        }
        Ok(self)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::invalid_input(format!("Unencodable body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn form(mut self, form: FormData) -> Self {
        self.body = RequestBody::Form(form);
        self
    }

    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    /// Shorthand for requests that must not carry the session token.
    pub fn anonymous(self) -> Self {
        self.auth(AuthMode::Anonymous)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn auth_mode(&self) -> &AuthMode {
        &self.auth
    }
}
