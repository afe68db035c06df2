//! OAuth 2.1 authorization server core.
//!
//! Implements the subset of OAuth 2.1 required for MCP remote access:
//!
//! ## Supported Standards
//! - RFC 7591: Dynamic Client Registration
//! - RFC 7636: PKCE (S256)
//! - RFC 6749: Authorization Code Grant
//! - RFC 6750: Bearer token validation
//! - RFC 8414 / RFC 9728: Server and protected resource metadata

pub mod clock;
pub mod metadata;
pub mod persist;
pub mod pkce;
pub mod secrets;
pub mod store;
mod types;

pub use store::{IssuedToken, OAuthProvider};
pub use types::{AccessToken, AuthorizationCode, Client};
