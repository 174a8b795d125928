//! Session key fingerprinting.
//!
//! Operators compare the fingerprint logged by the chat service with the one
//! logged by the authentication service to confirm both share a key.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of the key's signing material.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use roomchat::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
