//! Session service: logout, profile edits and role reloads around the
//! credential store.

use std::sync::Arc;

use portico_core::endpoint::{LogoutEndpoint, RoleCatalog};
use portico_core::error::PorticoResult;
use portico_core::models::user::{UpdateUser, User};
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::store::{CredentialStore, SessionSnapshot};

/// Session service.
///
/// Generic over the backend so that the session layer has no
/// dependency on the HTTP client crate.
pub struct SessionService<B> {
    backend: Arc<B>,
    store: CredentialStore,
}

impl<B> Clone for SessionService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            store: self.store.clone(),
        }
    }
}

impl<B: LogoutEndpoint + RoleCatalog + 'static> SessionService<B> {
    pub fn new(backend: Arc<B>, store: CredentialStore) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Log out: the local session is cleared immediately, the backend is
    /// notified in the background. Failing to reach the backend does not
    /// undo the local logout. Must be called from within a Tokio runtime.
    pub fn logout(&self) {
        let snapshot = self.store.read();
        self.store.clear_session();

        let SessionSnapshot::Authenticated { user, access_token } = snapshot else {
            debug!("Logout without an active session");
            return;
        };
        info!(user_id = %user.id, "Logged out");

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.logout(&access_token).await {
                warn!(user_id = %user.id, error = %e, "Logout endpoint unreachable");
            }
        });
    }

    /// Merge a profile edit into the current actor.
    pub fn update_profile(&self, update: UpdateUser) -> Result<User, AuthError> {
        self.store.update_actor(update)
    }

    /// Re-fetch the current actor's role (after a server-side role edit)
    /// and replace it in the store.
    pub async fn reload_role(&self) -> PorticoResult<User> {
        let access_token = self
            .store
            .read()
            .access_token()
            .cloned()
            .ok_or(AuthError::NoActiveSession)?;

        let role = self.backend.current_role(&access_token).await?;
        debug!(role = %role.name, permissions = role.permissions.len(), "Role reloaded");

        let user = self.store.update_actor(UpdateUser {
            role: Some(role),
            ..Default::default()
        })?;
        Ok(user)
    }
}
