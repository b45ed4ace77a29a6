//! Endpoint trait definitions for the authentication backend.
//!
//! The session layer only talks to the backend through these traits, so
//! it has no dependency on the transport. All operations are async.

use crate::error::PorticoResult;
use crate::models::credential::{AccessToken, ExchangeOutcome, RefreshToken};
use crate::models::role::Role;

/// Mints access tokens from refresh tokens.
pub trait TokenExchange: Send + Sync {
    /// Exchange `refresh_token` for a new access token. An expired or
    /// revoked refresh token is an error.
    fn exchange(
        &self,
        refresh_token: &RefreshToken,
    ) -> impl Future<Output = PorticoResult<ExchangeOutcome>> + Send;

    /// Recover a refresh token when none is held in memory (first run,
    /// or after the session was cleared), e.g. from a longer-lived token
    /// kept in durable storage. `Ok(None)` means there is none.
    fn stored_refresh_token(
        &self,
    ) -> impl Future<Output = PorticoResult<Option<RefreshToken>>> + Send {
        async { Ok(None) }
    }
}

/// Server-side logout.
pub trait LogoutEndpoint: Send + Sync {
    fn logout(&self, access_token: &AccessToken) -> impl Future<Output = PorticoResult<()>> + Send;
}

/// Read-only source of the current actor's role and permissions.
pub trait RoleCatalog: Send + Sync {
    fn current_role(
        &self,
        access_token: &AccessToken,
    ) -> impl Future<Output = PorticoResult<Role>> + Send;
}
