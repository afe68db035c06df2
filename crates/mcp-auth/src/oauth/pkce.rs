//! PKCE (Proof Key for Code Exchange) verification.
//!
//! Implements S256 code challenge verification per RFC 7636.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Verify a code verifier against a stored challenge under the declared
/// method.
///
/// `S256` computes `BASE64URL(SHA256(code_verifier))` and compares it to
/// the stored challenge in constant time. Any other method is a hard
/// failure: the metadata document only ever advertises `S256`, and an
/// unknown method must never pass silently.
#[must_use]
pub fn verify(code_verifier: &str, code_challenge: &str, method: &str) -> bool {
    if method != "S256" {
        return false;
    }
    let hash = Sha256::digest(code_verifier.as_bytes());
    let computed = URL_SAFE_NO_PAD.encode(hash);
    computed.as_bytes().ct_eq(code_challenge.as_bytes()).into()
}
