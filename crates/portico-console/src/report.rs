//! What the console prints after bootstrap.

use portico_auth::gate::SessionContext;
use portico_auth::guard::{GuardDecision, RouteGuard};
use portico_core::models::route::RouteNode;
use portico_core::route_tree::filter_route_tree;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub navigation: Vec<RouteNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PageReport>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub path: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    Pending,
    Redirect { to: String },
    Unauthorized,
    Authorized,
}

impl From<GuardDecision> for PageOutcome {
    fn from(decision: GuardDecision) -> Self {
        match decision {
            GuardDecision::Pending => Self::Pending,
            GuardDecision::Redirect(redirect) => Self::Redirect { to: redirect.to },
            GuardDecision::Unauthorized => Self::Unauthorized,
            GuardDecision::Authorized(_) => Self::Authorized,
        }
    }
}

impl SessionReport {
    pub fn build(
        ctx: &SessionContext,
        guard: &RouteGuard,
        tree: &[RouteNode],
        pages: &[String],
    ) -> Self {
        let session = ctx.session();
        let user = session.user();

        Self {
            authenticated: session.is_authenticated(),
            user: user.map(|u| u.name.clone()),
            role: user.map(|u| u.role.name.clone()),
            navigation: filter_route_tree(tree, user),
            pages: pages
                .iter()
                .map(|path| PageReport {
                    path: path.clone(),
                    outcome: guard.check_path(ctx, tree, path).into(),
                })
                .collect(),
        }
    }
}
