//! Session error types.

use portico_core::error::PorticoError;
use thiserror::Error;

/// Errors raised by the session layer.
///
/// `Clone` because one refresh outcome is handed to every caller that
/// joined the same in-flight exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A session was set with a missing or empty field. Programming
    /// error; never shown to the operator.
    #[error("invalid session data: {0}")]
    InvalidSessionData(String),

    #[error("no active session")]
    NoActiveSession,

    /// Credential exchange failed for any reason. This is the ordinary
    /// "not logged in" path, not an application error.
    #[error("credential refresh failed: {0}")]
    RefreshFailed(String),

    #[error("invalid token: {0}")]
    TokenInvalid(String),
}

impl From<AuthError> for PorticoError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidSessionData(message) => PorticoError::Validation { message },
            AuthError::NoActiveSession
            | AuthError::RefreshFailed(_)
            | AuthError::TokenInvalid(_) => PorticoError::AuthenticationFailed {
                reason: err.to_string(),
            },
        }
    }
}
