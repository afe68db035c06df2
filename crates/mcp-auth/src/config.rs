//! Configuration for the authorization server.

use std::path::PathBuf;

/// Credential lifetime constants.
pub mod lifetimes {
    /// Authorization code lifetime: 10 minutes.
    pub const AUTH_CODE_TTL_SECS: u64 = 600;

    /// Access token lifetime: 24 hours.
    pub const ACCESS_TOKEN_TTL_SECS: u64 = 86_400;
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public base URL of this server as seen by clients, used in
    /// discovery metadata and redirect construction. Stored without a
    /// trailing slash.
    pub base_url: String,

    /// Snapshot file for clients and access tokens. `None` keeps all
    /// state in memory.
    pub persist_path: Option<PathBuf>,

    /// Access token lifetime in seconds.
    pub token_ttl: u64,
}

impl Config {
    /// Create a configuration for the given public base URL.
    #[must_use]
    pub fn new(base_url: &str, persist_path: Option<PathBuf>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            persist_path,
            token_ttl: lifetimes::ACCESS_TOKEN_TTL_SECS,
        }
    }

    /// Override the access token lifetime.
    #[must_use]
    pub const fn with_token_ttl(mut self, secs: u64) -> Self {
        self.token_ttl = secs;
        self
    }

    /// Create a test configuration without persistence.
    #[must_use]
    pub fn for_testing() -> Self {
        Self::new("https://auth.example.com", None)
    }
}
