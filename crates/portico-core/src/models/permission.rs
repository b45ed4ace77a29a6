//! Permission domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HTTP method a permission may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// An atomic capability held by a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    /// Stable identifier, conventionally the route path it unlocks
    /// (e.g. `/dashboard/push`). Unique within the catalog.
    pub path: String,
    /// Human-readable label.
    pub name: String,
    /// Methods this permission governs. Empty means every method.
    #[serde(default)]
    pub methods: Vec<HttpMethod>,
}

impl Permission {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Whether this permission covers `method`.
    pub fn allows_method(&self, method: HttpMethod) -> bool {
        self.methods.is_empty() || self.methods.contains(&method)
    }
}
