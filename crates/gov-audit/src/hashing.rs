// crates/gov-audit/src/hashing.rs
// ============================================================================
// Module: Canonical Hashing
// Description: RFC 8785 JSON canonicalization and SHA-256 content hashing for
//              audit entries.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Every audit entry is
//! hashed over its RFC 8785 (JCS) canonical JSON encoding, which fixes field
//! order and number/string formatting so two serializations of the same
//! logical value always hash identically. `HashAlgorithm` is carried as an
//! explicit enum (today only SHA-256) so the chain format can add algorithms
//! later without breaking the wire shape.

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

/// The all-zero previous-hash value used for the first entry in a chain.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// A byte cap on canonical JSON input to `hash_canonical_json_with_limit`,
/// guarding against a pathological entry exhausting memory during
/// canonicalization. An ambient robustness concern, not a spec feature.
pub const DEFAULT_CANONICALIZATION_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// Supported hash algorithms for audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 (the only algorithm this chain currently produces).
    Sha256,
}

/// Errors raised while canonicalizing or hashing an audit entry.
#[derive(Debug, Error)]
pub enum HashError {
    /// Canonical JSON serialization failed.
    #[error("failed to canonicalize entry for hashing: {0}")]
    Canonicalization(String),
    /// Canonical JSON exceeded the configured size guard.
    #[error("canonical json of {actual} bytes exceeds the {limit} byte guard")]
    TooLarge {
        /// Observed canonical JSON size in bytes.
        actual: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
}

/// Returns the RFC 8785 canonical JSON bytes for `value`.
///
/// # Errors
/// Returns [`HashError::Canonicalization`] if `value` fails to serialize.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Hashes the canonical JSON of `value` with SHA-256, returning lowercase hex.
///
/// # Errors
/// Returns [`HashError::Canonicalization`] if `value` fails to serialize.
pub fn hash_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_hex(&bytes))
}

/// Hashes the canonical JSON of `value`, rejecting input whose canonical form
/// exceeds `limit` bytes.
///
/// # Errors
/// Returns [`HashError::Canonicalization`] on serialization failure, or
/// [`HashError::TooLarge`] if the canonical encoding exceeds `limit`.
pub fn hash_canonical_json_with_limit<T: Serialize + ?Sized>(value: &T, limit: usize) -> Result<String, HashError> {
    let bytes = canonical_json_bytes(value)?;
    if bytes.len() > limit {
        return Err(HashError::TooLarge {
            actual: bytes.len(),
            limit,
        });
    }
    Ok(hash_hex(&bytes))
}

/// Hashes raw bytes with SHA-256, returning lowercase hex.
#[must_use]
pub fn hash_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex_encode(&digest)
}

/// Hashes the concatenation of two hex-encoded hashes (used by the Merkle
/// tree: `hash(left || right)` over the raw bytes each hex string decodes to).
///
/// Falls back to hashing the raw UTF-8 text of `left`/`right` if either is
/// not valid hex, which cannot happen for hashes produced by this module but
/// keeps this function total rather than panicking on malformed input.
#[must_use]
pub fn hash_pair(left: &str, right: &str) -> String {
    let mut bytes = Vec::with_capacity(left.len() + right.len());
    match (hex_decode(left), hex_decode(right)) {
        (Some(mut l), Some(mut r)) => {
            bytes.append(&mut l);
            bytes.append(&mut r);
        }
        _ => {
            bytes.extend_from_slice(left.as_bytes());
            bytes.extend_from_slice(right.as_bytes());
        }
    }
    hash_hex(&bytes)
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Decodes a lowercase hex string into bytes, returning `None` on malformed input.
fn hex_decode(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(text.len() / 2);
    let chars: Vec<char> = text.chars().collect();
    for pair in chars.chunks(2) {
        let high = pair[0].to_digit(16)?;
        let low = pair[1].to_digit(16)?;
        #[allow(clippy::cast_possible_truncation, reason = "high/low are each < 16, so the combined value fits in u8")]
        out.push(((high << 4) | low) as u8);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::GENESIS_HASH;
    use super::hash_canonical_json;
    use super::hash_canonical_json_with_limit;
    use super::hash_pair;
    use serde_json::json;

    #[test]
    fn genesis_hash_is_sixty_four_zero_characters() {
        assert_eq!(GENESIS_HASH.len(), 64);
        assert!(GENESIS_HASH.chars().all(|c| c == '0'));
    }

    #[test]
    fn identical_values_hash_identically() {
        let a = hash_canonical_json(&json!({"b": 2, "a": 1})).unwrap_or_default();
        let b = hash_canonical_json(&json!({"a": 1, "b": 2})).unwrap_or_default();
        assert_eq!(a, b);
    }

    #[test]
    fn size_guard_rejects_oversized_input() {
        let big = json!({"payload": "x".repeat(100)});
        let result = hash_canonical_json_with_limit(&big, 10);
        assert!(result.is_err());
    }

    #[test]
    fn hash_pair_is_order_sensitive() {
        let a = hash_pair("aa", "bb");
        let b = hash_pair("bb", "aa");
        assert_ne!(a, b);
    }
}
