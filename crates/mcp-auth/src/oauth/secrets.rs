//! Opaque credential generation.
//!
//! Every identifier the server mints (client ids, client secrets,
//! authorization codes, access tokens) is an unguessable URL-safe string
//! drawn from the OS RNG. Validity of a credential is determined solely
//! by server-side lookup; none of these strings carry decodable
//! structure.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Client id entropy: 32 bytes (256 bits).
const CLIENT_ID_BYTES: usize = 32;

/// Secret, code and token entropy: 48 bytes (384 bits).
const SECRET_BYTES: usize = 48;

fn random_urlsafe(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

#[must_use]
pub fn new_client_id() -> String {
    random_urlsafe(CLIENT_ID_BYTES)
}

#[must_use]
pub fn new_client_secret() -> String {
    random_urlsafe(SECRET_BYTES)
}

#[must_use]
pub fn new_auth_code() -> String {
    random_urlsafe(SECRET_BYTES)
}

#[must_use]
pub fn new_access_token() -> String {
    random_urlsafe(SECRET_BYTES)
}
