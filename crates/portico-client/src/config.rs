//! HTTP backend configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for reaching the authentication backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root (e.g., `https://api.example.com/v1`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Token exchange endpoint, relative to `base_url`.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    /// Endpoint returning the current actor's role with permissions.
    #[serde(default = "default_role_path")]
    pub role_path: String,
    /// File holding a longer-lived refresh token, used when no session
    /// is held in memory.
    #[serde(default)]
    pub refresh_token_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_refresh_path() -> String {
    "/auth/refresh".into()
}

fn default_logout_path() -> String {
    "/auth/logout".into()
}

fn default_role_path() -> String {
    "/auth/me/role".into()
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            refresh_path: default_refresh_path(),
            logout_path: default_logout_path(),
            role_path: default_role_path(),
            refresh_token_file: None,
        }
    }
}
