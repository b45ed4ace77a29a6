//! User (actor) domain model.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::role::Role;

/// The operator logged into the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    /// Free-form profile fields returned by the API.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Partial update merged into the current user after a profile edit.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    /// On the wire: a string sets, `null` clears, an absent field leaves
    /// the phone alone.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
    pub role: Option<Role>,
    pub metadata: Option<serde_json::Value>,
}

/// A field that is present, even as `null`, is a change.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl User {
    /// Apply a partial update in place.
    pub fn apply(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(metadata) = update.metadata {
            self.metadata = metadata;
        }
    }
}
