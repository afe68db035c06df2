//! Expiry behavior at the TTL boundaries, driven by a manual clock.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use mcp_auth::config::Config;
use mcp_auth::error::AuthError;
use mcp_auth::oauth::OAuthProvider;
use mcp_auth::oauth::clock::ManualClock;

const REDIRECT_URI: &str = "https://client.example/cb";
const VERIFIER: &str = "test_verifier_123";
const START: u64 = 1_700_000_000;

fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn provider_with_clock(config: &Config) -> (OAuthProvider, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let provider = OAuthProvider::with_clock(config, clock.clone());
    (provider, clock)
}

async fn issued_code(provider: &OAuthProvider) -> (String, String) {
    let client = provider.register_client(vec![REDIRECT_URI.to_owned()], None).await;
    let code = provider
        .create_authorization_code(
            &client.client_id,
            REDIRECT_URI,
            &challenge_for(VERIFIER),
            "S256",
            "mcp",
        )
        .await
        .unwrap();
    (client.client_id, code)
}

// ─── Authorization codes ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_code_still_valid_at_exact_ttl() {
    let (provider, clock) = provider_with_clock(&Config::for_testing());
    let (client_id, code) = issued_code(&provider).await;

    clock.advance(600);
    assert!(provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.is_ok());
}

#[tokio::test]
async fn test_code_expired_one_second_past_ttl() {
    let (provider, clock) = provider_with_clock(&Config::for_testing());
    let (client_id, code) = issued_code(&provider).await;

    clock.advance(601);
    let result = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await;
    assert!(matches!(result, Err(AuthError::CodeExpired)));

    // The expired entry was deleted: the code now behaves as if it
    // never existed.
    let again = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await;
    assert!(matches!(again, Err(AuthError::CodeNotFound)));
}

// ─── Access tokens ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_token_still_valid_at_exact_ttl() {
    let (provider, clock) = provider_with_clock(&Config::for_testing());
    let (client_id, code) = issued_code(&provider).await;
    let issued = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();

    clock.advance(86_400);
    assert!(provider.validate_token(&issued.access_token).await.is_some());
}

#[tokio::test]
async fn test_token_expired_one_second_past_ttl() {
    let (provider, clock) = provider_with_clock(&Config::for_testing());
    let (client_id, code) = issued_code(&provider).await;
    let issued = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();

    clock.advance(86_401);
    assert!(provider.validate_token(&issued.access_token).await.is_none());

    // And stays absent on repeated attempts.
    assert!(provider.validate_token(&issued.access_token).await.is_none());
}

#[tokio::test]
async fn test_configured_token_ttl_override() {
    let config = Config::for_testing().with_token_ttl(60);
    let (provider, clock) = provider_with_clock(&config);
    let (client_id, code) = issued_code(&provider).await;

    let issued = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();
    assert_eq!(issued.expires_in, 60);

    clock.advance(60);
    assert!(provider.validate_token(&issued.access_token).await.is_some());
    clock.advance(1);
    assert!(provider.validate_token(&issued.access_token).await.is_none());
}
