//! Portico Client: reqwest implementation of the authentication
//! endpoint traits defined in `portico-core`.
//!
//! This crate provides:
//! - Configuration ([`ClientConfig`])
//! - The HTTP backend ([`HttpAuthBackend`]) implementing
//!   `TokenExchange`, `LogoutEndpoint` and `RoleCatalog`
//! - Error types ([`ClientError`])

mod config;
mod error;
mod http;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpAuthBackend;
