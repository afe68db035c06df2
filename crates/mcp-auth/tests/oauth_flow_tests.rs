//! Integration tests for the authorization-code flow through the
//! provider: registration → code creation → exchange → validation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use mcp_auth::config::Config;
use mcp_auth::error::AuthError;
use mcp_auth::oauth::OAuthProvider;

const REDIRECT_URI: &str = "https://client.example/cb";
const VERIFIER: &str = "test_verifier_123";

fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

async fn registered_provider() -> (OAuthProvider, String) {
    let provider = OAuthProvider::new(&Config::for_testing());
    let client =
        provider.register_client(vec![REDIRECT_URI.to_owned()], Some("Test App".into())).await;
    (provider, client.client_id)
}

async fn code_for(provider: &OAuthProvider, client_id: &str) -> String {
    provider
        .create_authorization_code(
            client_id,
            REDIRECT_URI,
            &challenge_for(VERIFIER),
            "S256",
            "mcp",
        )
        .await
        .unwrap()
}

// ─── Round trip ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_round_trip_issues_a_validating_token() {
    let (provider, client_id) = registered_provider().await;
    let code = code_for(&provider, &client_id).await;

    let issued = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();
    assert_eq!(issued.scope, "mcp");
    assert_eq!(issued.expires_in, 86_400);

    let record = provider.validate_token(&issued.access_token).await.unwrap();
    assert_eq!(record.client_id, client_id);
    assert_eq!(record.scope, "mcp");
}

// ─── Single use ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_code_is_single_use() {
    let (provider, client_id) = registered_provider().await;
    let code = code_for(&provider, &client_id).await;

    provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();

    // Identical, fully correct parameters: still rejected.
    let again = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await;
    assert!(matches!(again, Err(AuthError::CodeNotFound)));
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unknown_client_cannot_get_a_code() {
    let provider = OAuthProvider::new(&Config::for_testing());
    let result = provider
        .create_authorization_code("ghost", REDIRECT_URI, "challenge", "S256", "mcp")
        .await;
    assert!(matches!(result, Err(AuthError::UnknownClient)));
}

#[tokio::test]
async fn test_registration_accepts_empty_redirect_list() {
    let provider = OAuthProvider::new(&Config::for_testing());
    let client = provider.register_client(Vec::new(), None).await;

    assert!(!client.client_id.is_empty());
    assert!(client.client_secret.is_some());
    assert!(provider.get_client(&client.client_id).await.is_some());
}

#[tokio::test]
async fn test_secret_only_revealed_at_registration_time() {
    let provider = OAuthProvider::new(&Config::for_testing());
    let client = provider.register_client(vec![REDIRECT_URI.into()], None).await;

    // The stored record carries the secret too; lookups are the caller's
    // responsibility to redact. What matters is that two registrations
    // never share one.
    let other = provider.register_client(vec![REDIRECT_URI.into()], None).await;
    assert_ne!(client.client_secret, other.client_secret);
    assert_ne!(client.client_id, other.client_id);
}

// ─── Binding enforcement ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_exchange_enforces_client_binding() {
    let (provider, client_id) = registered_provider().await;
    let code = code_for(&provider, &client_id).await;

    let result = provider.exchange_code(&code, "other-client", REDIRECT_URI, VERIFIER).await;
    assert!(matches!(result, Err(AuthError::ClientMismatch)));

    // The failure leaves the code alive.
    provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();
}

#[tokio::test]
async fn test_exchange_enforces_redirect_binding() {
    let (provider, client_id) = registered_provider().await;
    let code = code_for(&provider, &client_id).await;

    let result = provider
        .exchange_code(&code, &client_id, "https://evil.example/cb", VERIFIER)
        .await;
    assert!(matches!(result, Err(AuthError::RedirectMismatch)));

    provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();
}

// ─── PKCE ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wrong_verifier_fails_but_leaves_code_alive() {
    let (provider, client_id) = registered_provider().await;
    let code = code_for(&provider, &client_id).await;

    let result = provider
        .exchange_code(&code, &client_id, REDIRECT_URI, "not_the_verifier")
        .await;
    assert!(matches!(result, Err(AuthError::PkceVerificationFailed)));

    // Retry amnesty: the correct verifier still works inside the TTL.
    let issued = provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await.unwrap();
    assert!(provider.validate_token(&issued.access_token).await.is_some());
}

#[tokio::test]
async fn test_non_s256_method_never_verifies() {
    let (provider, client_id) = registered_provider().await;

    // "plain" is stored as the method but is not a supported transform:
    // even verifier == challenge must fail.
    let code = provider
        .create_authorization_code(&client_id, REDIRECT_URI, "same-value", "plain", "mcp")
        .await
        .unwrap();

    let result = provider.exchange_code(&code, &client_id, REDIRECT_URI, "same-value").await;
    assert!(matches!(result, Err(AuthError::PkceVerificationFailed)));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_exchanges_yield_one_winner() {
    let (provider, client_id) = registered_provider().await;
    let code = code_for(&provider, &client_id).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let provider = provider.clone();
        let code = code.clone();
        let client_id = client_id.clone();
        handles.push(tokio::spawn(async move {
            provider.exchange_code(&code, &client_id, REDIRECT_URI, VERIFIER).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AuthError::CodeNotFound) => {}
            Err(e) => panic!("unexpected failure kind: {e}"),
        }
    }
    assert_eq!(successes, 1);
}
