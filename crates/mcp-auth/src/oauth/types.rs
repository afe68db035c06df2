//! Records owned by the authorization server stores.

use serde::{Deserialize, Serialize};

use crate::config::lifetimes;

/// A dynamically registered OAuth client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    /// Issued at registration; public clients never present it again.
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    /// Unix seconds.
    pub created_at: u64,
}

/// An authorization code and the context it is bound to.
///
/// Single-use, short-lived, never persisted.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: String,
    /// Stored verbatim; only `S256` will verify at exchange time.
    pub code_challenge_method: String,
    pub scope: String,
    /// Unix seconds.
    pub created_at: u64,
}

impl AuthorizationCode {
    /// Expired when strictly past the code lifetime.
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at) > lifetimes::AUTH_CODE_TTL_SECS
    }
}

/// A bearer access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub client_id: String,
    pub scope: String,
    /// Unix seconds.
    pub created_at: u64,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

impl AccessToken {
    /// Expired when strictly past the token lifetime.
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at) > self.expires_in
    }

    /// Reload filter: an exactly-at-lifetime token is not resurrected.
    #[must_use]
    pub fn is_stale(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at) >= self.expires_in
    }
}
