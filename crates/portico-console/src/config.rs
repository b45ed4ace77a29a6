//! Console configuration file.

use std::path::Path;

use portico_auth::config::AuthConfig;
use portico_client::ClientConfig;
use portico_core::error::{PorticoError, PorticoResult};
use portico_core::models::route::RouteNode;
use serde::Deserialize;

use crate::navigation::console_navigation;

/// Top-level console configuration.
///
/// ```toml
/// [client]
/// base_url = "https://api.example.com/v1"
/// refresh_token_file = "/var/lib/portico/refresh_token"
///
/// [auth]
/// login_path = "/login"
///
/// [[navigation]]
/// name = "Push"
/// [[navigation.children]]
/// name = "Crear Push"
/// path = "/dashboard/push"
/// permission = "/dashboard/push"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub client: ClientConfig,
    pub auth: AuthConfig,
    /// Replaces the built-in navigation tree when non-empty.
    pub navigation: Vec<RouteNode>,
}

impl ConsoleConfig {
    pub fn load(path: &Path) -> PorticoResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PorticoError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> PorticoResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| PorticoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> PorticoResult<()> {
        if self.client.base_url.trim().is_empty() {
            return Err(PorticoError::Config("client.base_url must not be empty".into()));
        }
        if self.auth.refresh_timeout_secs == 0 {
            return Err(PorticoError::Config(
                "auth.refresh_timeout_secs must be positive".into(),
            ));
        }
        if !self.auth.login_path.starts_with('/') {
            return Err(PorticoError::Config(format!(
                "auth.login_path must be absolute, got {:?}",
                self.auth.login_path
            )));
        }
        Ok(())
    }

    /// The navigation tree in effect.
    pub fn navigation(&self) -> Vec<RouteNode> {
        if self.navigation.is_empty() {
            console_navigation()
        } else {
            self.navigation.clone()
        }
    }
}
