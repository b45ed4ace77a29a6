//! Navigation tree filtering.
//!
//! The source tree is static configuration and is only ever borrowed;
//! every call produces a fresh, owned view containing what the actor may
//! reach.

use crate::authorize::is_authorized;
use crate::models::route::RouteNode;
use crate::models::user::User;

/// Prune `tree` to the nodes `actor` may see.
///
/// Leaves survive iff the actor is authorized for their requirement.
/// Interior nodes (including top-level sections) survive iff at least
/// one child survives; their own requirement is not consulted. Sibling
/// order is preserved.
pub fn filter_route_tree(tree: &[RouteNode], actor: Option<&User>) -> Vec<RouteNode> {
    tree.iter()
        .filter_map(|node| filter_node(node, actor))
        .collect()
}

fn filter_node(node: &RouteNode, actor: Option<&User>) -> Option<RouteNode> {
    if node.is_leaf() {
        return is_authorized(actor, node.permission.as_deref()).then(|| node.clone());
    }

    let visible = filter_route_tree(node.children.as_deref().unwrap_or_default(), actor);
    if visible.is_empty() {
        return None;
    }
    Some(RouteNode {
        name: node.name.clone(),
        path: node.path.clone(),
        permission: node.permission.clone(),
        children: Some(visible),
    })
}

/// Depth-first lookup of the node navigable at `path`.
pub fn find_route<'a>(tree: &'a [RouteNode], path: &str) -> Option<&'a RouteNode> {
    for node in tree {
        if node.path.as_deref() == Some(path) {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref().and_then(|c| find_route(c, path)) {
            return Some(found);
        }
    }
    None
}

/// The permission required by the page at `path`, if the page is in the
/// tree and declares one.
pub fn required_permission<'a>(tree: &'a [RouteNode], path: &str) -> Option<&'a str> {
    find_route(tree, path).and_then(|node| node.permission.as_deref())
}
