//! reqwest implementation of the authentication endpoints.

use portico_core::endpoint::{LogoutEndpoint, RoleCatalog, TokenExchange};
use portico_core::error::PorticoResult;
use portico_core::models::credential::{AccessToken, ExchangeOutcome, RefreshToken};
use portico_core::models::role::Role;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// HTTP client for the authentication backend.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpAuthBackend {
    /// Build a backend with the configured per-request timeout.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_refresh(&self, refresh_token: &RefreshToken) -> Result<ExchangeOutcome, ClientError> {
        let url = self.config.url(&self.config.refresh_path);
        debug!(%url, "Exchanging refresh token");

        let response = self
            .http
            .post(&url)
            .json(&RefreshRequest {
                refresh_token: refresh_token.as_str(),
            })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<ExchangeOutcome>().await?)
    }

    async fn post_logout(&self, access_token: &AccessToken) -> Result<(), ClientError> {
        let url = self.config.url(&self.config.logout_path);
        debug!(%url, "Notifying logout");

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token.as_str())
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn get_role(&self, access_token: &AccessToken) -> Result<Role, ClientError> {
        let url = self.config.url(&self.config.role_path);
        debug!(%url, "Fetching current role");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token.as_str())
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<Role>().await?)
    }

    async fn read_token_file(&self) -> Result<Option<RefreshToken>, ClientError> {
        let Some(path) = &self.config.refresh_token_file else {
            return Ok(None);
        };

        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    debug!(path = %path.display(), "Recovered stored refresh token");
                    Ok(Some(RefreshToken::new(token)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "Backend rejected request");
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

impl TokenExchange for HttpAuthBackend {
    async fn exchange(&self, refresh_token: &RefreshToken) -> PorticoResult<ExchangeOutcome> {
        Ok(self.post_refresh(refresh_token).await?)
    }

    async fn stored_refresh_token(&self) -> PorticoResult<Option<RefreshToken>> {
        Ok(self.read_token_file().await?)
    }
}

impl LogoutEndpoint for HttpAuthBackend {
    async fn logout(&self, access_token: &AccessToken) -> PorticoResult<()> {
        Ok(self.post_logout(access_token).await?)
    }
}

impl RoleCatalog for HttpAuthBackend {
    async fn current_role(&self, access_token: &AccessToken) -> PorticoResult<Role> {
        Ok(self.get_role(access_token).await?)
    }
}
