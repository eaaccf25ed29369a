//! User session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A signed-in shopper. The email is the identity key; nothing is verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Editable profile fields. Email and role are not editable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self { email: email.into(), name: None, phone: None, address: None, role, created_at: Utc::now() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.name = Some(name.into()); self }

    pub fn is_admin(&self) -> bool { self.role == Role::Admin }

    /// Applies a profile edit; blank fields clear the stored value.
    pub fn apply(&mut self, update: ProfileUpdate) {
        self.name = non_blank(update.name);
        self.phone = non_blank(update.phone);
        self.address = non_blank(update.address);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
