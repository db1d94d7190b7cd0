//! Cryptographic utilities for secret hashing and comparison.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a presented secret against the expected value.
///
/// Both sides are hashed before comparison, so the time taken does not
/// depend on how many leading characters match.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    sha256_hex(presented) == sha256_hex(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        assert_eq!(hash.len(), 64);
        // SHA256 of empty string
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        let hash1 = sha256_hex("same_input");
        let hash2 = sha256_hex("same_input");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_sha256_hex_different_inputs() {
        let hash1 = sha256_hex("input1");
        let hash2 = sha256_hex("input2");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_secrets_match_equal() {
        assert!(secrets_match("cron-secret-123", "cron-secret-123"));
    }

    #[test]
    fn test_secrets_match_different() {
        assert!(!secrets_match("cron-secret-123", "cron-secret-124"));
        assert!(!secrets_match("cron-secret-123", "cron-secret-12"));
    }

    #[test]
    fn test_secrets_match_empty() {
        assert!(secrets_match("", ""));
        assert!(!secrets_match("", "something"));
    }

    #[test]
    fn test_secrets_match_unicode() {
        assert!(secrets_match("秘密", "秘密"));
        assert!(!secrets_match("秘密", "秘密 "));
    }
}
