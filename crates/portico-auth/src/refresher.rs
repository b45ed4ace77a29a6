//! Credential refresher: exchanges the refresh token for a new access
//! token, at most once per concurrent window.
//!
//! Concurrent callers of [`CredentialRefresher::refresh`] join the
//! exchange already in flight instead of starting their own. The
//! exchange runs on its own task, so dropping a caller (an unmounted
//! page, a cancelled navigation) never cancels the store update.
//!
//! An exchange only writes back to the store if no login or logout
//! happened while it was outstanding; otherwise its result is dropped
//! and callers see `RefreshFailed`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use portico_core::endpoint::TokenExchange;
use portico_core::models::credential::{AccessToken, RefreshToken};
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::store::CredentialStore;
use crate::token::{expires_within, fingerprint};

type RefreshOutcome = Result<AccessToken, AuthError>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

struct InFlight {
    generation: u64,
    outcome: SharedRefresh,
}

struct Inner<E> {
    exchange: E,
    store: CredentialStore,
    timeout: Duration,
    leeway: Duration,
    in_flight: Mutex<Option<InFlight>>,
    generation: AtomicU64,
}

/// Single-flight credential refresher. Cheap to clone; clones share the
/// in-flight slot.
pub struct CredentialRefresher<E> {
    inner: Arc<Inner<E>>,
}

impl<E> Clone for CredentialRefresher<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: TokenExchange + 'static> CredentialRefresher<E> {
    pub fn new(exchange: E, store: CredentialStore, config: &AuthConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                exchange,
                store,
                timeout: config.refresh_timeout(),
                leeway: config.refresh_leeway(),
                in_flight: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    /// Obtain a new access token.
    ///
    /// On failure the session has already been cleared when this
    /// returns. No retry is attempted. Must be called from within a Tokio
    /// runtime.
    pub async fn refresh(&self) -> Result<AccessToken, AuthError> {
        self.join_or_start().await
    }

    /// Refresh only if the current access token is missing or expires
    /// within the configured leeway; otherwise return it unchanged.
    pub async fn refresh_if_expiring(&self) -> Result<AccessToken, AuthError> {
        let snapshot = self.inner.store.read();
        match snapshot.access_token() {
            Some(token) if !expires_within(token, self.inner.leeway) => Ok(token.clone()),
            _ => self.refresh().await,
        }
    }

    /// Whether an exchange is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.inner.in_flight.lock().is_some()
    }

    fn join_or_start(&self) -> SharedRefresh {
        let mut slot = self.inner.in_flight.lock();
        if let Some(in_flight) = slot.as_ref() {
            debug!(generation = in_flight.generation, "Joining in-flight refresh");
            return in_flight.outcome.clone();
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let outcome = inner.run_exchange(generation).await;
            inner.finish(generation);
            outcome
        });

        let outcome = async move {
            task.await.unwrap_or_else(|e| {
                Err(AuthError::RefreshFailed(format!("refresh task aborted: {e}")))
            })
        }
        .boxed()
        .shared();

        *slot = Some(InFlight {
            generation,
            outcome: outcome.clone(),
        });
        outcome
    }
}

impl<E: TokenExchange> Inner<E> {
    async fn run_exchange(&self, generation: u64) -> RefreshOutcome {
        let (revision, held) = self.store.refresh_point();
        debug!(generation, revision, "Starting credential refresh");
        match self.try_exchange(revision, held).await {
            Ok(token) => {
                info!(
                    generation,
                    token = %fingerprint(token.as_str()),
                    "Credential refreshed"
                );
                Ok(token)
            }
            Err(err) => {
                // Expected for anonymous visitors and expired sessions.
                if self.store.clear_if_current(revision) {
                    debug!(generation, error = %err, "Credential refresh failed, session cleared");
                } else {
                    debug!(generation, error = %err, "Credential refresh failed, newer session kept");
                }
                Err(err)
            }
        }
    }

    async fn try_exchange(&self, revision: u64, held: Option<RefreshToken>) -> RefreshOutcome {
        let refresh_token = match held {
            Some(token) => token,
            None => self.recover_refresh_token().await?,
        };

        let outcome = tokio::time::timeout(self.timeout, self.exchange.exchange(&refresh_token))
            .await
            .map_err(|_| {
                AuthError::RefreshFailed(format!(
                    "exchange timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        let refresh_token = outcome.refresh_token.unwrap_or(refresh_token);
        let access_token = outcome.access_token;

        self.store
            .replace_if_current(revision, outcome.user, access_token.clone(), refresh_token)
            .map_err(|e| match e {
                AuthError::RefreshFailed(_) => e,
                other => AuthError::RefreshFailed(other.to_string()),
            })?;
        Ok(access_token)
    }

    async fn recover_refresh_token(&self) -> Result<RefreshToken, AuthError> {
        let recovered = tokio::time::timeout(self.timeout, self.exchange.stored_refresh_token())
            .await
            .map_err(|_| AuthError::RefreshFailed("stored token lookup timed out".into()))?
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        match recovered {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::RefreshFailed(
                "no refresh credential available".into(),
            )),
        }
    }

    fn finish(&self, generation: u64) {
        let mut slot = self.in_flight.lock();
        if slot.as_ref().is_some_and(|f| f.generation == generation) {
            *slot = None;
        }
    }
}
