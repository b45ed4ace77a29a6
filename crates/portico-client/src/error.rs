//! HTTP-specific error types and conversions.

use portico_core::error::PorticoError;

/// HTTP-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ClientError> for PorticoError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_timeout() => PorticoError::Timeout,
            ClientError::Http(e) if e.is_decode() => PorticoError::Validation {
                message: format!("malformed response: {e}"),
            },
            ClientError::Status { status: 401 | 403, body } => {
                PorticoError::AuthenticationFailed { reason: body }
            }
            ClientError::Io(e) => PorticoError::Internal(e.to_string()),
            other => PorticoError::Transport(other.to_string()),
        }
    }
}
