//! HTTP boundary for the authorization server.
//!
//! Maps the OAuth core onto axum routes and provides the bearer-auth
//! layer a downstream resource server mounts over its own routes.

pub mod consent;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::oauth::OAuthProvider;

/// Shared state for HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    pub provider: OAuthProvider,
    /// Base URL for metadata and endpoint announcements.
    pub base_url: String,
}

/// Standalone authorization server.
pub struct AuthServer {
    state: Arc<AppState>,
}

impl AuthServer {
    /// Construct the server and reload any persisted state.
    pub async fn new(config: Config) -> Self {
        let provider = OAuthProvider::new(&config);
        provider.restore().await;
        Self::with_provider(provider, &config)
    }

    /// Wrap an existing provider, e.g. one built with an injected clock.
    #[must_use]
    pub fn with_provider(provider: OAuthProvider, config: &Config) -> Self {
        let state = Arc::new(AppState { provider, base_url: config.base_url.clone() });
        Self { state }
    }

    #[must_use]
    pub fn provider(&self) -> &OAuthProvider {
        &self.state.provider
    }

    /// The OAuth endpoint router: discovery, registration,
    /// authorization, token exchange, health.
    #[must_use]
    pub fn router(&self) -> Router {
        create_router(Arc::clone(&self.state))
    }

    /// Wrap resource routes behind bearer-token validation.
    ///
    /// Requests without a valid token are answered `401` with a
    /// `WWW-Authenticate: Bearer` challenge before reaching the
    /// resource; valid requests carry the `AccessToken` record in
    /// request extensions.
    #[must_use]
    pub fn protect(&self, resource: Router) -> Router {
        resource.layer(middleware::from_fn_with_state(
            Arc::clone(&self.state),
            handlers::require_bearer,
        ))
    }

    /// Serve the OAuth endpoints until ctrl-c.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for AuthServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServer").field("base_url", &self.state.base_url).finish()
    }
}

/// Build the OAuth endpoint router.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::handle_health))
        .route(
            "/.well-known/oauth-authorization-server",
            get(handlers::handle_auth_server_metadata),
        )
        .route(
            "/.well-known/oauth-protected-resource",
            get(handlers::handle_protected_resource),
        )
        .route("/register", post(handlers::handle_register))
        .route(
            "/authorize",
            get(handlers::handle_authorize_get).post(handlers::handle_authorize_post),
        )
        .route("/token", post(handlers::handle_token))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
