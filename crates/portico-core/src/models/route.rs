//! Navigation tree node.

use serde::{Deserialize, Serialize};

/// One entry of the static navigation tree.
///
/// Top-level nodes are sections. A node with `children` is an interior
/// (grouping) node; a node without is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Required `Permission::path`. `None` means always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RouteNode>>,
}

impl RouteNode {
    /// A navigable leaf.
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            permission: None,
            children: None,
        }
    }

    /// A grouping node owning `children`.
    pub fn section(name: impl Into<String>, children: Vec<RouteNode>) -> Self {
        Self {
            name: name.into(),
            path: None,
            permission: None,
            children: Some(children),
        }
    }

    pub fn requires(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// A node with an empty `children` list is still interior.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
