//! Content fingerprinting for change detection.
//!
//! Fingerprints are computed over the note body only, with frontmatter
//! stripped first, so the stamp identifies source content independent of any
//! metadata the pipeline adds later. The same function both produces the
//! `note_hash` stamp and detects no-op reprocessing by comparing a fresh
//! fingerprint against a previously stamped one.

use sha2::{Digest, Sha256};

/// Algorithm prefix carried by every fingerprint.
pub const HASH_PREFIX: &str = "sha256:";

/// Compute the content fingerprint of a note body.
///
/// Returns `sha256:` followed by 64 lowercase hex characters. Deterministic:
/// identical bodies always yield identical fingerprints.
pub fn hash_body(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{}{}", HASH_PREFIX, hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Known SHA-256 digests, prefixed the way the pipeline stamps them.
    const VECTORS: &[(&str, &str)] = &[
        (
            "",
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ),
        (
            "abc",
            "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        ),
        (
            "buy milk",
            "sha256:933260194ce59178528d37861b7a69a5a7c221c81e8d7035474fd56acf895525",
        ),
    ];

    #[test]
    fn matches_known_vectors() {
        for (body, expected) in VECTORS {
            assert_eq!(hash_body(body), *expected, "body {body:?}");
        }
    }

    #[test]
    fn format_is_prefix_plus_64_hex() {
        let stamp = hash_body("some note text");
        let digest = stamp.strip_prefix(HASH_PREFIX).expect("prefix");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn deterministic_and_distinct() {
        assert_eq!(hash_body("same"), hash_body("same"));
        assert_ne!(hash_body("one body"), hash_body("another body"));
        // Body-only hashing: whitespace differences are real differences.
        assert_ne!(hash_body("text"), hash_body("text\n"));
    }

    #[test]
    fn unicode_bodies_hash_by_utf8_bytes() {
        let stamp = hash_body("Grüße, 世界");
        assert_eq!(stamp, hash_body("Grüße, 世界"));
        assert!(stamp.starts_with(HASH_PREFIX));
    }
}
