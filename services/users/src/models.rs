//! Models for user records and gateway payloads

use common::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role preselected in the create form
pub const DEFAULT_ROLE: &str = "user";

pub const FIELDS_REQUIRED: &str = "phone, email and role are required";

/// User record as listed by the admin API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: String,
}

/// Request for user creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserRequest {
    pub phone: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Contents of the create-user form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub phone: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            phone: String::new(),
            email: String::new(),
            name: String::new(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl UserForm {
    /// Trim every field; phone, email and role must be non-empty
    pub fn validate(&self) -> Result<CreateUserRequest, String> {
        let phone = self.phone.trim();
        let email = self.email.trim();
        let role = self.role.trim();

        if phone.is_empty() || email.is_empty() || role.is_empty() {
            return Err(FIELDS_REQUIRED.to_string());
        }

        Ok(CreateUserRequest {
            phone: phone.to_string(),
            email: email.to_string(),
            name: self.name.trim().to_string(),
            role: role.to_string(),
        })
    }

    /// Empty the form, keeping the default role selected
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Request asking the gateway to send a QR login message
#[derive(Debug, Clone, Serialize)]
pub struct SendQrRequest {
    pub to: String,
}

/// Interpretation of the gateway's QR response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrStatus {
    /// QR delivered to the user's email
    Sent { email: String },
    /// The user's gateway session is already linked
    AlreadyConnected,
    /// Anything else, kept as compact JSON
    Unexpected(String),
}

impl QrStatus {
    pub fn from_payload(payload: Payload) -> Self {
        let value = payload.into_json();

        match value.get("status").and_then(Value::as_str) {
            Some("sent") => QrStatus::Sent {
                email: value
                    .get("email")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            Some("already_connected") => QrStatus::AlreadyConnected,
            _ => QrStatus::Unexpected(value.to_string()),
        }
    }
}
