//! Log-safe key fingerprints.
//!
//! Key values are bearer tokens, so they never go into logs verbatim.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 12;

/// Compute a short SHA-256 fingerprint of a key value for logging.
pub fn key_fingerprint(value: &str) -> String {
    let hash = Sha256::digest(value.as_bytes());
    let mut encoded = hex::encode(hash);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = key_fingerprint("ABCD1234EFGH5678");
        let b = key_fingerprint("ABCD1234EFGH5678");
        let c = key_fingerprint("ZZZZ");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), FINGERPRINT_LEN);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_does_not_leak_value() {
        let fp = key_fingerprint("ABC123");
        assert!(!fp.contains("ABC123"));
        // SHA-256("ABC123") starts with e0bebd22
        assert!(fp.starts_with("e0bebd22"));
    }
}
