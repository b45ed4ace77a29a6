//! Credential store: the single source of truth for who is logged in
//! and with which credentials.
//!
//! Backed by a [`tokio::sync::watch`] channel: every mutation replaces
//! the state under the channel's lock and marks it changed for all
//! subscribers before the mutating call returns.
//!
//! Every login and logout also bumps a revision counter under that same
//! lock. A writer that started from an older revision (an exchange that
//! was in flight while the operator logged out) has its write refused.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use portico_core::models::credential::{AccessToken, RefreshToken};
use portico_core::models::user::{UpdateUser, User};
use tokio::sync::watch;
use tracing::debug;

use crate::error::AuthError;
use crate::token::fingerprint;

/// An authenticated session as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub user: User,
    pub access_token: AccessToken,
    refresh_token: RefreshToken,
}

/// Everything the store holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    Authenticated(ActiveSession),
}

/// What readers see: the actor and access token, or the explicit
/// anonymous sentinel. The refresh token never leaves the store.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSnapshot {
    Anonymous,
    Authenticated {
        user: User,
        access_token: AccessToken,
    },
}

impl SessionSnapshot {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user, .. } => Some(user),
        }
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { access_token, .. } => Some(access_token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::LoggedOut => Self::Anonymous,
            SessionState::Authenticated(session) => Self::Authenticated {
                user: session.user.clone(),
                access_token: session.access_token.clone(),
            },
        }
    }
}

/// Process-wide, observable session state. Cheap to clone; all clones
/// share the same state.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    state: watch::Sender<SessionState>,
    revision: Arc<AtomicU64>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::LoggedOut);
        Self {
            state,
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the current session. Rejected with
    /// [`AuthError::InvalidSessionData`] if any field is empty, in which
    /// case the store is left untouched.
    pub fn set_session(
        &self,
        user: User,
        access_token: AccessToken,
        refresh_token: RefreshToken,
    ) -> Result<(), AuthError> {
        validate(&user, &access_token, &refresh_token)?;

        debug!(
            user_id = %user.id,
            token = %fingerprint(access_token.as_str()),
            "Session set"
        );
        self.state.send_modify(|state| {
            *state = SessionState::Authenticated(ActiveSession {
                user,
                access_token,
                refresh_token,
            });
            self.bump();
        });
        Ok(())
    }

    /// Transition to logged out. Idempotent.
    pub fn clear_session(&self) {
        let mut previous = SessionState::LoggedOut;
        self.state.send_modify(|state| {
            previous = std::mem::take(state);
            self.bump();
        });
        if let SessionState::Authenticated(session) = previous {
            debug!(user_id = %session.user.id, "Session cleared");
        }
    }

    /// Current actor and access token, or [`SessionSnapshot::Anonymous`].
    pub fn read(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*self.state.borrow())
    }

    /// Merge a partial update into the current actor, keeping the
    /// credentials.
    pub fn update_actor(&self, update: UpdateUser) -> Result<User, AuthError> {
        let mut updated = None;
        self.state.send_if_modified(|state| match state {
            SessionState::LoggedOut => false,
            SessionState::Authenticated(session) => {
                session.user.apply(update);
                updated = Some(session.user.clone());
                true
            }
        });
        updated.ok_or(AuthError::NoActiveSession)
    }

    /// Subscribe to every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user().cloned()
    }

    /// Current revision and the refresh token held at that revision.
    pub(crate) fn refresh_point(&self) -> (u64, Option<RefreshToken>) {
        let state = self.state.borrow();
        let token = match &*state {
            SessionState::LoggedOut => None,
            SessionState::Authenticated(session) => Some(session.refresh_token.clone()),
        };
        (self.revision.load(Ordering::Acquire), token)
    }

    /// Install refreshed credentials, provided nothing logged in or out
    /// since `revision`. Without a fresh `user` the held actor is kept.
    pub(crate) fn replace_if_current(
        &self,
        revision: u64,
        user: Option<User>,
        access_token: AccessToken,
        refresh_token: RefreshToken,
    ) -> Result<(), AuthError> {
        let mut outcome = Err(AuthError::RefreshFailed("session superseded".into()));
        self.state.send_if_modified(|state| {
            if self.revision.load(Ordering::Acquire) != revision {
                return false;
            }
            let held = match &*state {
                SessionState::LoggedOut => None,
                SessionState::Authenticated(session) => Some(&session.user),
            };
            let Some(user) = user.or_else(|| held.cloned()) else {
                outcome = Err(AuthError::RefreshFailed(
                    "exchange returned no actor".into(),
                ));
                return false;
            };
            if let Err(e) = validate(&user, &access_token, &refresh_token) {
                outcome = Err(e);
                return false;
            }

            debug!(
                user_id = %user.id,
                token = %fingerprint(access_token.as_str()),
                "Session refreshed"
            );
            *state = SessionState::Authenticated(ActiveSession {
                user,
                access_token,
                refresh_token,
            });
            self.bump();
            outcome = Ok(());
            true
        });
        outcome
    }

    /// Log out, provided nothing logged in or out since `revision`.
    /// Returns whether the store was cleared.
    pub(crate) fn clear_if_current(&self, revision: u64) -> bool {
        let mut cleared = false;
        self.state.send_if_modified(|state| {
            if self.revision.load(Ordering::Acquire) != revision {
                return false;
            }
            *state = SessionState::LoggedOut;
            self.bump();
            cleared = true;
            true
        });
        cleared
    }

    // Only called with the channel's write lock held.
    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }
}

fn validate(
    user: &User,
    access_token: &AccessToken,
    refresh_token: &RefreshToken,
) -> Result<(), AuthError> {
    if user.id.is_nil() || user.name.trim().is_empty() {
        return Err(AuthError::InvalidSessionData("actor is missing".into()));
    }
    if access_token.is_empty() {
        return Err(AuthError::InvalidSessionData(
            "access token is empty".into(),
        ));
    }
    if refresh_token.is_empty() {
        return Err(AuthError::InvalidSessionData(
            "refresh token is empty".into(),
        ));
    }
    Ok(())
}
