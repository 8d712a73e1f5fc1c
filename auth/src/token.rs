//! Opaque token generation and digesting.
//!
//! Session ids and password-reset secrets are both drawn from the same
//! primitive: 32 random bytes, base64url-encoded without padding. The raw
//! value is handed to the caller exactly once; when a token must be looked
//! up later (reset tokens), only its SHA-256 digest is persisted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::Digest;
use sha2::Sha256;

/// Generate a cryptographically random opaque token
/// (32 bytes, base64url-encoded, no padding).
pub fn generate() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest of a raw token, hex-encoded.
///
/// This is the value stored at rest as `token_hash`.
pub fn digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unguessable_shape() {
        let token = generate();

        // 32 bytes -> 43 base64url characters without padding
        assert_eq!(token.len(), 43);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_generate_does_not_repeat() {
        let first = generate();
        let second = generate();
        assert_ne!(first, second);
    }

    #[test]
    fn test_digest_is_stable_hex_sha256() {
        let token = "fixed-raw-token";

        let first = digest(token);
        let second = digest(token);

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, digest("other-raw-token"));
    }
}
