//! Error types for the authorization server.
//!
//! Uses `thiserror` for structured error handling so the HTTP boundary
//! can map every kind to its wire-level OAuth error code exhaustively
//! instead of string-matching messages.

/// Errors raised by the OAuth core operations.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// Referenced client id is not in the registry.
    #[error("unknown client")]
    UnknownClient,

    /// Authorization code absent from the store: never issued, or
    /// already consumed.
    #[error("invalid authorization code")]
    CodeNotFound,

    /// Authorization code existed but exceeded its lifetime.
    #[error("authorization code expired")]
    CodeExpired,

    /// Exchange client_id disagrees with the code's stored binding.
    #[error("client_id mismatch")]
    ClientMismatch,

    /// Exchange redirect_uri disagrees with the code's stored binding.
    #[error("redirect_uri mismatch")]
    RedirectMismatch,

    /// Code verifier does not reproduce the stored challenge.
    #[error("PKCE verification failed")]
    PkceVerificationFailed,

    /// Token request used a grant type other than authorization_code.
    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// Malformed registration payload.
    #[error("invalid client metadata: {0}")]
    RegistrationInvalid(String),

    /// Snapshot could not be read or written. Logged and recovered
    /// locally; never surfaced as a request failure.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}

impl AuthError {
    /// The OAuth 2.0 error code the boundary layer reports for this kind.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownClient | Self::ClientMismatch => "invalid_client",
            Self::CodeNotFound
            | Self::CodeExpired
            | Self::RedirectMismatch
            | Self::PkceVerificationFailed => "invalid_grant",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::RegistrationInvalid(_) => "invalid_client_metadata",
            Self::PersistenceUnavailable(_) => "server_error",
        }
    }

    /// True for failures of client identity, answered 401 rather than 400.
    #[must_use]
    pub const fn is_client_identity(&self) -> bool {
        matches!(self, Self::UnknownClient | Self::ClientMismatch)
    }
}

impl From<std::io::Error> for AuthError {
    fn from(e: std::io::Error) -> Self {
        Self::PersistenceUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        Self::PersistenceUnavailable(e.to_string())
    }
}

/// Result type alias for OAuth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::CodeNotFound.error_code(), "invalid_grant");
        assert_eq!(AuthError::CodeExpired.error_code(), "invalid_grant");
        assert_eq!(AuthError::PkceVerificationFailed.error_code(), "invalid_grant");
        assert_eq!(AuthError::ClientMismatch.error_code(), "invalid_client");
        assert_eq!(
            AuthError::UnsupportedGrantType("password".into()).error_code(),
            "unsupported_grant_type"
        );
    }

    #[test]
    fn test_client_identity_split() {
        assert!(AuthError::ClientMismatch.is_client_identity());
        assert!(AuthError::UnknownClient.is_client_identity());
        assert!(!AuthError::RedirectMismatch.is_client_identity());
        assert!(!AuthError::CodeNotFound.is_client_identity());
    }

    #[test]
    fn test_io_errors_become_persistence_kind() {
        let err: AuthError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "ro").into();
        assert_eq!(err.error_code(), "server_error");
    }
}
