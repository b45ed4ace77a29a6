//! Session bootstrap gate.
//!
//! Holds back every credential-dependent piece of the console until the
//! initial refresh attempt has settled:
//!
//! ```text
//! Unresolved --mount()--> Resolving --refresh settles--> Resolved
//! ```
//!
//! `Resolved` is terminal. Readiness is published through a watch
//! channel, so any holder of a [`Readiness`] or [`SessionContext`] can
//! check or await it without being handed the gate itself.

use std::sync::Arc;

use parking_lot::Mutex;
use portico_core::endpoint::TokenExchange;
use tokio::sync::watch;
use tracing::debug;

use crate::refresher::CredentialRefresher;
use crate::store::{CredentialStore, SessionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Unresolved,
    Resolving,
    Resolved,
}

/// What the application shell should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Placeholder / loading indication.
    Loading,
    /// The protected tree.
    Ready,
}

/// Read side of the gate's readiness flag.
#[derive(Debug, Clone)]
pub struct Readiness {
    rx: watch::Receiver<bool>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the gate has resolved. Returns immediately if it
    /// already has.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as the gate; if it is gone the gate
        // can no longer resolve and there is nothing to wait for.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl From<watch::Receiver<bool>> for Readiness {
    fn from(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }
}

/// Readiness plus the credential store: the ambient session context
/// handed to every page.
#[derive(Debug, Clone)]
pub struct SessionContext {
    readiness: Readiness,
    store: CredentialStore,
}

impl SessionContext {
    pub fn new(readiness: Readiness, store: CredentialStore) -> Self {
        Self { readiness, store }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// The session as pages must see it: anonymous until the gate has
    /// resolved, even if credentials are already present.
    pub fn session(&self) -> SessionSnapshot {
        if self.is_ready() {
            self.store.read()
        } else {
            SessionSnapshot::Anonymous
        }
    }
}

struct GateInner<E> {
    refresher: CredentialRefresher<E>,
    phase: Mutex<GatePhase>,
    ready: watch::Sender<bool>,
}

/// The session bootstrap gate. Cheap to clone; clones share state, so
/// mounting any clone mounts them all.
pub struct SessionGate<E> {
    inner: Arc<GateInner<E>>,
}

impl<E> Clone for SessionGate<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: TokenExchange + 'static> SessionGate<E> {
    pub fn new(refresher: CredentialRefresher<E>) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            inner: Arc::new(GateInner {
                refresher,
                phase: Mutex::new(GatePhase::Unresolved),
                ready,
            }),
        }
    }

    pub fn phase(&self) -> GatePhase {
        *self.inner.phase.lock()
    }

    pub fn view(&self) -> GateView {
        match self.phase() {
            GatePhase::Resolved => GateView::Ready,
            GatePhase::Unresolved | GatePhase::Resolving => GateView::Loading,
        }
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            rx: self.inner.ready.subscribe(),
        }
    }

    pub fn context(&self) -> SessionContext {
        SessionContext::new(self.readiness(), self.inner.refresher.store().clone())
    }

    /// Start resolving the session. Only the first call has an effect;
    /// repeated mounts join the same resolution. Must be called from
    /// within a Tokio runtime.
    pub fn mount(&self) -> Readiness {
        {
            let mut phase = self.inner.phase.lock();
            if *phase != GatePhase::Unresolved {
                debug!(phase = ?*phase, "Session gate already mounted");
                return self.readiness();
            }
            *phase = GatePhase::Resolving;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let authenticated = inner.refresher.refresh().await.is_ok();
            *inner.phase.lock() = GatePhase::Resolved;
            inner.ready.send_replace(true);
            debug!(authenticated, "Session gate resolved");
        });

        self.readiness()
    }

    /// Mount (if needed) and wait for resolution.
    pub async fn resolve(&self) -> SessionContext {
        self.mount().wait().await;
        self.context()
    }
}
