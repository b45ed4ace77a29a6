//! Access token inspection.
//!
//! The console never holds the backend's signing keys, so it cannot
//! verify an access token. It only reads the claims to schedule refreshes
//! and fingerprints tokens so that logs never carry the raw value.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use portico_core::models::credential::AccessToken;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Claims the session layer reads from an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID).
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Issued-at (Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Decode the payload of a JWT access token without verifying its
/// signature or expiry.
pub fn peek_claims(token: &AccessToken) -> Result<AccessTokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<AccessTokenClaims>(
        token.as_str(),
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::TokenInvalid(e.to_string()))
}

/// Whether `token` expires within `leeway` from now.
///
/// A token whose claims cannot be read is reported as expiring, so the
/// caller refreshes it rather than trusting it indefinitely.
pub fn expires_within(token: &AccessToken, leeway: Duration) -> bool {
    match peek_claims(token) {
        Ok(claims) => {
            let leeway = i64::try_from(leeway.as_secs()).unwrap_or(i64::MAX);
            claims.exp <= Utc::now().timestamp().saturating_add(leeway)
        }
        Err(_) => true,
    }
}

/// Short SHA-256 fingerprint of a token, safe to log.
pub fn fingerprint(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    hex::encode(&digest[..6])
}
