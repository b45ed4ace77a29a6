//! Role domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::permission::Permission;

/// Named bundle of authorization.
///
/// Roles are read-only on the client: they are fetched from the role
/// catalog and replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    /// Global override: an admin is authorized for every capability.
    #[serde(default)]
    pub is_admin: bool,
    /// A role delivered without this field is treated as holding nothing.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_admin: false,
            permissions: Vec::new(),
        }
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(name)
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Look up a held permission by exact path.
    pub fn permission(&self, path: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.path == path)
    }
}
