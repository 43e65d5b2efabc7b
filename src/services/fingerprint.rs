//! Stable fingerprints over request parameters, used as cache keys.

use sha2::{Digest, Sha256};

/// SHA-256 over the given parts, hex encoded.
///
/// Parts are fed through a separator so neighbouring fields cannot run into
/// each other ("ab"+"c" vs "a"+"bc").
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint(&["acme", "month", "2.0"]);
        let b = fingerprint(&["acme", "month", "2.0"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_any_part_changes_the_fingerprint() {
        let base = fingerprint(&["acme", "month", "2.0"]);
        assert_ne!(base, fingerprint(&["acme", "week", "2.0"]));
        assert_ne!(base, fingerprint(&["acme", "month", "2.5"]));
        assert_ne!(base, fingerprint(&["globex", "month", "2.0"]));
    }

    #[test]
    fn test_field_boundaries_matter() {
        assert_ne!(fingerprint(&["ab", "c"]), fingerprint(&["a", "bc"]));
    }

    #[test]
    fn test_empty_parts_are_distinct_from_no_parts() {
        assert_ne!(fingerprint(&[]), fingerprint(&[""]));
    }
}
