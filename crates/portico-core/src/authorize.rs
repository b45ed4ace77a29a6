//! Permission evaluation.
//!
//! Every route guard and every conditionally rendered control goes
//! through these two functions, so edge cases (no actor, missing role
//! permissions, admin override) are decided in exactly one place.

use crate::models::permission::HttpMethod;
use crate::models::user::User;

/// Decide whether `actor` may reach something gated by `required`.
///
/// 1. No actor: denied.
/// 2. Admin role: allowed, the allow-list is not consulted.
/// 3. No requirement: allowed.
/// 4. Otherwise allowed iff the role holds a permission whose `path`
///    equals `required` exactly (no prefix or glob matching).
pub fn is_authorized(actor: Option<&User>, required: Option<&str>) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    if actor.role.is_admin {
        return true;
    }
    match required {
        None => true,
        Some(path) => actor.role.permission(path).is_some(),
    }
}

/// Like [`is_authorized`], additionally honouring the HTTP methods a
/// permission is restricted to. Used for in-page actions such as a
/// delete button.
pub fn is_authorized_for(actor: Option<&User>, path: &str, method: HttpMethod) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    if actor.role.is_admin {
        return true;
    }
    actor
        .role
        .permission(path)
        .is_some_and(|p| p.allows_method(method))
}
