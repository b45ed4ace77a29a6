//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the session layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Upper bound on one credential exchange, in seconds (default: 10).
    pub refresh_timeout_secs: u64,
    /// How close to expiry an access token may get before an on-demand
    /// refresh exchanges it, in seconds (default: 60).
    pub refresh_leeway_secs: u64,
    /// Where unauthenticated visitors are sent (default: `/login`).
    pub login_path: String,
}

impl AuthConfig {
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    pub fn refresh_leeway(&self) -> Duration {
        Duration::from_secs(self.refresh_leeway_secs)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_timeout_secs: 10,
            refresh_leeway_secs: 60,
            login_path: "/login".into(),
        }
    }
}
