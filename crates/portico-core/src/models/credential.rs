//! Access and refresh credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::User;

macro_rules! opaque_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(<redacted>)"))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

opaque_token!(
    /// Short-lived credential attached to every outbound API call.
    AccessToken
);

opaque_token!(
    /// Longer-lived credential used only to mint new access tokens.
    RefreshToken
);

/// Result of a successful token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    pub access_token: AccessToken,
    /// Present when the backend rotates the refresh token.
    #[serde(default)]
    pub refresh_token: Option<RefreshToken>,
    /// Present when the backend returns a fresh profile with the token.
    #[serde(default)]
    pub user: Option<User>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl ExchangeOutcome {
    pub fn new(access_token: impl Into<AccessToken>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            user: None,
            expires_in: None,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_refresh_token(mut self, token: impl Into<RefreshToken>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }
}
