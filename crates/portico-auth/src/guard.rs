//! Per-page route guarding.
//!
//! A guard decision is re-derived from the session context on every
//! navigation. Nothing is cached between pages with different
//! permission requirements.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use portico_core::authorize::is_authorized;
use portico_core::models::route::RouteNode;
use portico_core::models::user::User;
use portico_core::route_tree::required_permission;
use tracing::debug;

use crate::config::AuthConfig;
use crate::gate::SessionContext;

/// Client-side navigation instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    /// Replace the current history entry instead of pushing, so the back
    /// button does not lead into the protected page again.
    pub replace: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// The gate has not resolved yet: render nothing, decide nothing.
    Pending,
    /// No actor: go to the login entry point.
    Redirect(Redirect),
    /// Actor present but lacks the page's permission.
    Unauthorized,
    Authorized(User),
}

/// What a guarded page ends up rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Loading,
    Redirect(Redirect),
    Unauthorized,
    Ready(T),
    /// The page navigated away before its fetch finished; the result was
    /// discarded.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
}

impl RouteGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide what the page gated by `permission` may show.
    pub fn check(&self, ctx: &SessionContext, permission: Option<&str>) -> GuardDecision {
        if !ctx.is_ready() {
            return GuardDecision::Pending;
        }

        let session = ctx.session();
        let Some(user) = session.user() else {
            debug!(to = %self.login_path, "No session, redirecting to login");
            return GuardDecision::Redirect(Redirect {
                to: self.login_path.clone(),
                replace: true,
            });
        };

        if is_authorized(Some(user), permission) {
            GuardDecision::Authorized(user.clone())
        } else {
            debug!(user_id = %user.id, permission = ?permission, "Page not authorized");
            GuardDecision::Unauthorized
        }
    }

    /// [`check`](Self::check) for the page navigable at `path`, taking its
    /// requirement from the navigation tree. Pages absent from the tree
    /// carry no requirement.
    pub fn check_path(&self, ctx: &SessionContext, tree: &[RouteNode], path: &str) -> GuardDecision {
        self.check(ctx, required_permission(tree, path))
    }

    /// Run the page's data fetch only once the actor is known to be
    /// authorized; otherwise `fetch` is never called.
    pub async fn load<T, F, Fut>(
        &self,
        ctx: &SessionContext,
        permission: Option<&str>,
        fetch: F,
    ) -> PageState<T>
    where
        F: FnOnce(User) -> Fut,
        Fut: Future<Output = T>,
    {
        match self.check(ctx, permission) {
            GuardDecision::Pending => PageState::Loading,
            GuardDecision::Redirect(redirect) => PageState::Redirect(redirect),
            GuardDecision::Unauthorized => PageState::Unauthorized,
            GuardDecision::Authorized(user) => PageState::Ready(fetch(user).await),
        }
    }

    /// Like [`load`](Self::load), discarding the result if `ticket` was
    /// superseded while the fetch was running.
    pub async fn load_scoped<T, F, Fut>(
        &self,
        ctx: &SessionContext,
        permission: Option<&str>,
        ticket: &EffectTicket,
        fetch: F,
    ) -> PageState<T>
    where
        F: FnOnce(User) -> Fut,
        Fut: Future<Output = T>,
    {
        match self.load(ctx, permission, fetch).await {
            PageState::Ready(_) if !ticket.is_current() => PageState::Superseded,
            state => state,
        }
    }
}

/// Page-local effect scope. Each [`enter`](Self::enter) supersedes the
/// tickets handed out before it.
#[derive(Debug, Clone, Default)]
pub struct EffectScope {
    epoch: Arc<AtomicU64>,
}

impl EffectScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> EffectTicket {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        EffectTicket {
            epoch,
            scope: Arc::clone(&self.epoch),
        }
    }

    /// Invalidate every outstanding ticket (page unmounted).
    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug, Clone)]
pub struct EffectTicket {
    epoch: u64,
    scope: Arc<AtomicU64>,
}

impl EffectTicket {
    pub fn is_current(&self) -> bool {
        self.scope.load(Ordering::Acquire) == self.epoch
    }
}
