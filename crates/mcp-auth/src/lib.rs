//! Embedded OAuth 2.1 authorization server for remote MCP access.
//!
//! Issues and validates the credentials that gate access to an MCP
//! resource served over HTTP/SSE. Implements the OAuth 2.1 subset the
//! MCP specification requires:
//!
//! - **Dynamic Client Registration** (RFC 7591)
//! - **Authorization Code flow with PKCE** (RFC 7636)
//! - **Bearer token validation** (RFC 6750)
//! - **Server and resource metadata discovery** (RFC 8414 / RFC 9728)
//!
//! Tokens are opaque random strings validated by server-side lookup.
//! Clients and access tokens optionally persist to a JSON snapshot
//! across restarts; authorization codes are short-lived and never
//! durable.
//!
//! # Example
//!
//! ```no_run
//! use mcp_auth::{config::Config, server::AuthServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new("https://mcp.example.com", None);
//!     let server = AuthServer::new(config).await;
//!     server.run_http(8000).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod oauth;
pub mod server;

pub use config::Config;
pub use error::{AuthError, AuthResult};
pub use oauth::OAuthProvider;
