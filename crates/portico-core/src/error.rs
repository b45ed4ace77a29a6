//! Error types for the Portico system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PorticoError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied for permission {permission}")]
    AuthorizationDenied { permission: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PorticoResult<T> = Result<T, PorticoError>;
