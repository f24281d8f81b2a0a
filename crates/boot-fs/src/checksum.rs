//! SHA-256 digests for content comparison and staging keys

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `content`.
pub fn digest_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// A short, filesystem-safe key derived from `value`.
///
/// Sixteen hex characters; used to name per-reference staging directories.
pub fn short_key(value: &str) -> String {
    let mut digest = digest_hex(value.as_bytes());
    digest.truncate(16);
    digest
}
