//! Discovery documents.
//!
//! Stateless functions of the configured base URL; endpoint URLs are
//! fixed path suffixes joined onto it.

use serde_json::{Value, json};

/// OAuth 2.0 Authorization Server Metadata (RFC 8414).
#[must_use]
pub fn server_metadata(base_url: &str) -> Value {
    json!({
        "issuer": base_url,
        "authorization_endpoint": format!("{base_url}/authorize"),
        "token_endpoint": format!("{base_url}/token"),
        "registration_endpoint": format!("{base_url}/register"),
        "response_types_supported": ["code"],
        "grant_types_supported": ["authorization_code"],
        "token_endpoint_auth_methods_supported": ["client_secret_post", "none"],
        "code_challenge_methods_supported": ["S256"],
        "scopes_supported": ["mcp"],
    })
}

/// OAuth Protected Resource Metadata (RFC 9728).
#[must_use]
pub fn resource_metadata(base_url: &str) -> Value {
    json!({
        "resource": base_url,
        "authorization_servers": [base_url],
        "scopes_supported": ["mcp"],
        "bearer_methods_supported": ["header"],
    })
}
