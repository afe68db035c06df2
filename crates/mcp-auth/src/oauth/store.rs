//! Authorization server state: client registry, single-use code store
//! and bearer token store behind one service object.
//!
//! All three maps are owned exclusively by the provider; no ambient or
//! static state. Mutations snapshot clients and tokens to disk when
//! persistence is configured. Authorization codes never touch disk.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{AuthError, AuthResult};

use super::clock::{Clock, SystemClock};
use super::persist::{Snapshot, SnapshotStore};
use super::pkce;
use super::secrets;
use super::types::{AccessToken, AuthorizationCode, Client};

/// In-memory OAuth state with optional file persistence.
#[derive(Clone)]
pub struct OAuthProvider {
    clients: Arc<RwLock<HashMap<String, Client>>>,
    auth_codes: Arc<RwLock<HashMap<String, AuthorizationCode>>>,
    access_tokens: Arc<RwLock<HashMap<String, AccessToken>>>,
    clock: Arc<dyn Clock>,
    store: Option<Arc<SnapshotStore>>,
    token_ttl: u64,
}

impl OAuthProvider {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build with an injected clock for deterministic expiry behavior.
    #[must_use]
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            auth_codes: Arc::new(RwLock::new(HashMap::new())),
            access_tokens: Arc::new(RwLock::new(HashMap::new())),
            clock,
            store: config.persist_path.clone().map(|path| Arc::new(SnapshotStore::new(path))),
            token_ttl: config.token_ttl,
        }
    }

    /// Reload the snapshot written by a previous run, if any.
    ///
    /// A missing file is a normal first start; a malformed one degrades
    /// to empty state with a warning. Neither is fatal.
    pub async fn restore(&self) {
        let Some(store) = &self.store else { return };
        if !store.path().exists() {
            return;
        }
        match store.load(self.clock.now()).await {
            Ok(snapshot) => {
                let clients = snapshot.clients.len();
                let tokens = snapshot.access_tokens.len();
                *self.clients.write().await = snapshot.clients;
                *self.access_tokens.write().await = snapshot.access_tokens;
                tracing::info!(clients, tokens, "Restored persisted OAuth state");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load persisted state, starting fresh");
            }
        }
    }

    /// Register a new OAuth client (Dynamic Client Registration).
    ///
    /// Always succeeds; an empty redirect-URI list is accepted. The
    /// returned record is the only place the client secret is ever
    /// revealed.
    pub async fn register_client(
        &self,
        redirect_uris: Vec<String>,
        client_name: Option<String>,
    ) -> Client {
        let client = Client {
            client_id: secrets::new_client_id(),
            client_secret: Some(secrets::new_client_secret()),
            redirect_uris,
            client_name,
            created_at: self.clock.now(),
        };

        self.clients.write().await.insert(client.client_id.clone(), client.clone());
        self.persist().await;

        tracing::info!(
            client_id = %client.client_id,
            client_name = client.client_name.as_deref().unwrap_or("<unnamed>"),
            "Registered OAuth client"
        );
        client
    }

    /// Look up a client by id. No side effects.
    pub async fn get_client(&self, client_id: &str) -> Option<Client> {
        self.clients.read().await.get(client_id).cloned()
    }

    /// Create an authorization code after user consent.
    ///
    /// The code is bound to every supplied parameter; the challenge
    /// method is stored verbatim and judged only at exchange time.
    pub async fn create_authorization_code(
        &self,
        client_id: &str,
        redirect_uri: &str,
        code_challenge: &str,
        code_challenge_method: &str,
        scope: &str,
    ) -> AuthResult<String> {
        if !self.clients.read().await.contains_key(client_id) {
            return Err(AuthError::UnknownClient);
        }

        let code = secrets::new_auth_code();
        self.auth_codes.write().await.insert(
            code.clone(),
            AuthorizationCode {
                client_id: client_id.to_owned(),
                redirect_uri: redirect_uri.to_owned(),
                code_challenge: code_challenge.to_owned(),
                code_challenge_method: code_challenge_method.to_owned(),
                scope: scope.to_owned(),
                created_at: self.clock.now(),
            },
        );
        self.persist().await;

        tracing::info!(client_id = %client_id, "Created authorization code");
        Ok(code)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// The lookup-check-delete sequence runs under one write lock on the
    /// code map, so two concurrent exchanges of the same code cannot
    /// both succeed. An expired code is deleted on sight. Binding and
    /// PKCE failures leave the code in place: the client may retry with
    /// corrected parameters inside the TTL window.
    pub async fn exchange_code(
        &self,
        code: &str,
        client_id: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> AuthResult<IssuedToken> {
        let granted = {
            let mut codes = self.auth_codes.write().await;
            let auth_code = codes.get(code).ok_or(AuthError::CodeNotFound)?;

            if auth_code.is_expired(self.clock.now()) {
                codes.remove(code);
                drop(codes);
                self.persist().await;
                return Err(AuthError::CodeExpired);
            }
            if auth_code.client_id != client_id {
                return Err(AuthError::ClientMismatch);
            }
            if auth_code.redirect_uri != redirect_uri {
                return Err(AuthError::RedirectMismatch);
            }
            if !pkce::verify(
                code_verifier,
                &auth_code.code_challenge,
                &auth_code.code_challenge_method,
            ) {
                return Err(AuthError::PkceVerificationFailed);
            }

            let Some(consumed) = codes.remove(code) else {
                return Err(AuthError::CodeNotFound);
            };
            consumed
        };

        let token = secrets::new_access_token();
        let record = AccessToken {
            client_id: client_id.to_owned(),
            scope: granted.scope.clone(),
            created_at: self.clock.now(),
            expires_in: self.token_ttl,
        };

        // Insert overwrites: key uniqueness is not assumed to be
        // enforced by entropy alone.
        self.access_tokens.write().await.insert(token.clone(), record);
        self.persist().await;

        tracing::info!(client_id = %client_id, "Issued access token");

        Ok(IssuedToken { access_token: token, expires_in: self.token_ttl, scope: granted.scope })
    }

    /// Validate a bearer token.
    ///
    /// An expired entry is deleted on sight (lazy expiry, no sweep
    /// thread). The success path has no side effect.
    pub async fn validate_token(&self, token: &str) -> Option<AccessToken> {
        {
            let mut tokens = self.access_tokens.write().await;
            match tokens.get(token) {
                None => return None,
                Some(record) if !record.is_expired(self.clock.now()) => {
                    return Some(record.clone());
                }
                Some(_) => {
                    tokens.remove(token);
                }
            }
        }
        self.persist().await;
        None
    }

    /// Snapshot clients and tokens to disk.
    ///
    /// Failures are logged and recovered locally; no request ever fails
    /// on persistence.
    async fn persist(&self) {
        let Some(store) = &self.store else { return };
        let snapshot = Snapshot {
            clients: self.clients.read().await.clone(),
            access_tokens: self.access_tokens.read().await.clone(),
        };
        if let Err(e) = store.save(&snapshot).await {
            tracing::warn!(error = %e, "Could not persist OAuth state");
        }
    }
}

impl std::fmt::Debug for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthProvider").finish()
    }
}

/// The result of a successful code exchange.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
    pub scope: String,
}
