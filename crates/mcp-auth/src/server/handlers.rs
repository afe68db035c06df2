//! OAuth 2.0 endpoint handlers.
//!
//! Implements:
//! - RFC 8414: Authorization Server Metadata
//! - RFC 9728: Protected Resource Metadata
//! - RFC 7591: Dynamic Client Registration
//! - RFC 6749: Authorization Code Grant
//! - RFC 6750: Bearer token usage

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Query, Request, State},
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use axum_extra::typed_header::TypedHeaderRejection;
use serde::Deserialize;

use crate::error::AuthError;
use crate::oauth::{IssuedToken, metadata};

use super::AppState;
use super::consent;

// ─── Discovery ───────────────────────────────────────────────────────────────

/// `GET /.well-known/oauth-authorization-server`
///
/// Describes the OAuth endpoints and capabilities.
pub async fn handle_auth_server_metadata(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(metadata::server_metadata(&state.base_url))
}

/// `GET /.well-known/oauth-protected-resource`
///
/// Tells clients where to find the authorization server for this
/// resource.
pub async fn handle_protected_resource(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(metadata::resource_metadata(&state.base_url))
}

/// `GET /health`
pub async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mcp-auth",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ─── RFC 7591: Dynamic Client Registration ───────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub client_name: Option<String>,
    /// Absent is treated as the empty list; registration still succeeds.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// `POST /register`
///
/// Register a new OAuth client dynamically. Only a malformed payload is
/// rejected.
pub async fn handle_register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            let err = AuthError::RegistrationInvalid(rejection.body_text());
            tracing::warn!(error = %err, "Client registration failed");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": err.error_code(),
                    "error_description": err.to_string(),
                })),
            )
                .into_response();
        }
    };

    let client = state.provider.register_client(req.redirect_uris, req.client_name).await;

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "client_id": client.client_id,
            "client_secret": client.client_secret,
            "client_name": client.client_name,
            "redirect_uris": client.redirect_uris,
            "grant_types": ["authorization_code"],
            "response_types": ["code"],
            "token_endpoint_auth_method": "client_secret_post",
        })),
    )
        .into_response()
}

// ─── Authorization Endpoint ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub scope: Option<String>,
}

/// `GET /authorize`
///
/// Validate the authorization request and render the consent page.
pub async fn handle_authorize_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthorizeQuery>,
) -> Response {
    let Some(client_id) = query.client_id.as_deref() else {
        return (StatusCode::BAD_REQUEST, "Missing client_id").into_response();
    };
    let Some(redirect_uri) = query.redirect_uri.as_deref() else {
        return (StatusCode::BAD_REQUEST, "Missing redirect_uri").into_response();
    };
    let Some(code_challenge) = query.code_challenge.as_deref() else {
        return (StatusCode::BAD_REQUEST, "Missing code_challenge").into_response();
    };
    if query.response_type.as_deref() != Some("code") {
        return (StatusCode::BAD_REQUEST, "response_type must be 'code'").into_response();
    }

    let Some(client) = state.provider.get_client(client_id).await else {
        return (StatusCode::BAD_REQUEST, "Unknown client_id").into_response();
    };
    if !client.redirect_uris.iter().any(|uri| uri == redirect_uri) {
        return (StatusCode::BAD_REQUEST, "redirect_uri not registered for this client")
            .into_response();
    }

    let page = consent::render_consent_page(
        client.client_name.as_deref().unwrap_or("Unknown Client"),
        client_id,
        redirect_uri,
        query.state.as_deref().unwrap_or(""),
        code_challenge,
        query.code_challenge_method.as_deref().unwrap_or("S256"),
        query.scope.as_deref().unwrap_or("mcp"),
    );
    Html(page).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ConsentForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub redirect_uri: String,
    #[serde(default)]
    pub code_challenge: String,
    #[serde(default = "default_challenge_method")]
    pub code_challenge_method: String,
    #[serde(default)]
    pub state: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_challenge_method() -> String {
    "S256".to_owned()
}

fn default_scope() -> String {
    "mcp".to_owned()
}

/// `POST /authorize`
///
/// Consent form submission: issue an authorization code or deny.
pub async fn handle_authorize_post(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ConsentForm>,
) -> Response {
    if form.action != "approve" {
        let location = redirect_with_params(
            &form.redirect_uri,
            &[("error", "access_denied"), ("state", &form.state)],
        );
        return found(location);
    }

    match state
        .provider
        .create_authorization_code(
            &form.client_id,
            &form.redirect_uri,
            &form.code_challenge,
            &form.code_challenge_method,
            &form.scope,
        )
        .await
    {
        Ok(code) => {
            let location = redirect_with_params(
                &form.redirect_uri,
                &[("code", &code), ("state", &form.state)],
            );
            found(location)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Authorization request rejected");
            let location = redirect_with_params(
                &form.redirect_uri,
                &[
                    ("error", "server_error"),
                    ("error_description", &e.to_string()),
                    ("state", &form.state),
                ],
            );
            found(location)
        }
    }
}

// ─── Token Endpoint ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub grant_type: String,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_verifier: Option<String>,
    pub client_id: Option<String>,
}

/// `POST /token`
///
/// Exchange an authorization code for an access token.
pub async fn handle_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenRequest>,
) -> Response {
    if form.grant_type != "authorization_code" {
        let err = AuthError::UnsupportedGrantType(form.grant_type);
        return token_error(StatusCode::BAD_REQUEST, err.error_code(), &err.to_string());
    }

    let Some(code) = form.code.as_deref() else {
        return token_error(StatusCode::BAD_REQUEST, "invalid_request", "Missing code");
    };
    let Some(client_id) = form.client_id.as_deref() else {
        return token_error(StatusCode::BAD_REQUEST, "invalid_request", "Missing client_id");
    };
    let Some(redirect_uri) = form.redirect_uri.as_deref() else {
        return token_error(StatusCode::BAD_REQUEST, "invalid_request", "Missing redirect_uri");
    };
    let Some(code_verifier) = form.code_verifier.as_deref() else {
        return token_error(StatusCode::BAD_REQUEST, "invalid_request", "Missing code_verifier");
    };

    match state.provider.exchange_code(code, client_id, redirect_uri, code_verifier).await {
        Ok(issued) => token_success(&issued),
        Err(e) => {
            tracing::warn!(error = %e, "Token exchange failed");
            let status = if e.is_client_identity() {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::BAD_REQUEST
            };
            token_error(status, e.error_code(), &e.to_string())
        }
    }
}

/// Token response with the required OAuth 2.0 cache headers
/// (RFC 6749 §5.1).
fn token_success(issued: &IssuedToken) -> Response {
    let mut response = Json(serde_json::json!({
        "access_token": issued.access_token,
        "token_type": "Bearer",
        "expires_in": issued.expires_in,
        "scope": issued.scope,
    }))
    .into_response();

    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

fn token_error(status: StatusCode, error: &str, description: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "error_description": description,
        })),
    )
        .into_response()
}

// ─── RFC 6750: Bearer token validation ───────────────────────────────────────

/// Require a valid bearer token before reaching the wrapped resource.
///
/// The validated `AccessToken` record is inserted into request
/// extensions so resource handlers can read the owning client and scope.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    // Absent and malformed credentials both challenge with 401, never 400.
    let Ok(TypedHeader(Authorization(bearer))) = bearer else {
        return unauthorized("Bearer");
    };

    match state.provider.validate_token(bearer.token()).await {
        Some(token) => {
            request.extensions_mut().insert(token);
            next.run(request).await
        }
        None => unauthorized(r#"Bearer error="invalid_token""#),
    }
}

fn unauthorized(challenge: &'static str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge))],
    )
        .into_response()
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn found(location: String) -> Response {
    (StatusCode::FOUND, [("Location", location)]).into_response()
}

/// Append query parameters to a redirect URI, percent-encoding values.
fn redirect_with_params(redirect_uri: &str, params: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    let separator = if redirect_uri.contains('?') { '&' } else { '?' };
    format!("{redirect_uri}{separator}{query}")
}
