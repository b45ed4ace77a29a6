//! Shared fixtures for the session layer integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use portico_core::endpoint::{LogoutEndpoint, RoleCatalog, TokenExchange};
use portico_core::error::{PorticoError, PorticoResult};
use portico_core::models::credential::{AccessToken, ExchangeOutcome, RefreshToken};
use portico_core::models::permission::Permission;
use portico_core::models::role::Role;
use portico_core::models::route::RouteNode;
use portico_core::models::user::User;
use uuid::Uuid;

/// How the scripted exchange answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Grant(ExchangeOutcome),
    Fail(String),
    /// Never answers within any sane timeout.
    Hang,
}

/// In-memory token exchange that counts calls and answers after a
/// fixed delay.
#[derive(Clone)]
pub struct ScriptedExchange {
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<String>>>,
    reply: Arc<Mutex<Reply>>,
    delay: Duration,
    stored: Option<RefreshToken>,
}

impl ScriptedExchange {
    pub fn new(reply: Reply, delay: Duration) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new(reply)),
            delay,
            stored: None,
        }
    }

    pub fn with_stored(mut self, token: &str) -> Self {
        self.stored = Some(RefreshToken::new(token));
        self
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock() = reply;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenExchange for ScriptedExchange {
    async fn exchange(&self, refresh_token: &RefreshToken) -> PorticoResult<ExchangeOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(refresh_token.as_str().to_string());
        let reply = self.reply.lock().clone();

        match reply {
            Reply::Grant(outcome) => {
                tokio::time::sleep(self.delay).await;
                Ok(outcome)
            }
            Reply::Fail(reason) => {
                tokio::time::sleep(self.delay).await;
                Err(PorticoError::Transport(reason))
            }
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(PorticoError::Timeout)
            }
        }
    }

    async fn stored_refresh_token(&self) -> PorticoResult<Option<RefreshToken>> {
        Ok(self.stored.clone())
    }
}

/// Logout endpoint + role catalog double.
#[derive(Default)]
pub struct FakeBackend {
    pub logouts: Mutex<Vec<String>>,
    pub fail_logout: bool,
    pub role: Mutex<Option<Role>>,
}

impl LogoutEndpoint for FakeBackend {
    async fn logout(&self, access_token: &AccessToken) -> PorticoResult<()> {
        self.logouts.lock().push(access_token.as_str().to_string());
        if self.fail_logout {
            Err(PorticoError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl RoleCatalog for FakeBackend {
    async fn current_role(&self, _access_token: &AccessToken) -> PorticoResult<Role> {
        self.role.lock().clone().ok_or_else(|| PorticoError::NotFound {
            entity: "role".into(),
            id: "current".into(),
        })
    }
}

pub fn user_with(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Operadora".into(),
        email: "ops@example.com".into(),
        phone: None,
        role,
        metadata: serde_json::Value::Null,
    }
}

pub fn push_editor() -> User {
    user_with(
        Role::new("push-editor").with_permissions([Permission::new("/dashboard/push", "Crear Push")]),
    )
}

pub fn navigation() -> Vec<RouteNode> {
    vec![
        RouteNode::section(
            "Push",
            vec![
                RouteNode::leaf("Crear Push", "/dashboard/push").requires("/dashboard/push"),
                RouteNode::leaf("Logs", "/dashboard/push/logs").requires("/push/logs"),
            ],
        ),
        RouteNode::section(
            "Usuarios",
            vec![RouteNode::leaf("Usuarios", "/dashboard/users").requires("/users")],
        ),
    ]
}
