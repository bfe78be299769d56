//! Cryptographic Utilities
//!
//! Random secret generation and one-way token digests. Opaque tokens
//! (refresh, email verification) are handed out raw exactly once;
//! only their digest is ever persisted.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate an opaque token: `len` random bytes, hex-encoded
pub fn generate_token(len: usize) -> String {
    hex::encode(random_bytes(len))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// One-way digest of an opaque token secret (SHA-256, hex).
///
/// Deterministic, so a presented raw token can be matched against the
/// stored digest without the raw value ever being persisted.
pub fn token_digest(raw: &str) -> String {
    hex::encode(sha256(raw.as_bytes()))
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        // SHA-256 of empty string
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);

        // SHA-256 of "hello"
        let hash = sha256(b"hello");
        let expected =
            hex::decode("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_generate_token_length_and_uniqueness() {
        let a = generate_token(64);
        let b = generate_token(64);
        assert_eq!(a.len(), 128); // hex doubles the byte length
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_digest_deterministic() {
        let raw = "some-raw-token";
        assert_eq!(token_digest(raw), token_digest(raw));
        assert_ne!(token_digest(raw), token_digest("other"));
        // Fixed-length output regardless of input
        assert_eq!(token_digest(raw).len(), 64);
        assert_eq!(token_digest("").len(), 64);
    }

    #[test]
    fn test_token_digest_known_value() {
        assert_eq!(
            token_digest("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [1u8, 2, 3, 4];
        let b = [1u8, 2, 3, 4];
        let c = [1u8, 2, 3, 5];
        assert!(constant_time_eq(&a, &b));
        assert!(!constant_time_eq(&a, &c));
        assert!(!constant_time_eq(&a, &a[..3]));
    }
}
