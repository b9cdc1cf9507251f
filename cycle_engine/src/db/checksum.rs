//! Integrity checksums for stored history documents.

use sha2::{Digest, Sha256};

/// Suffix appended to a history key to form its checksum key.
pub const CHECKSUM_SUFFIX: &str = ".checksum";

/// Calculate the SHA-256 checksum of a serialized history document.
///
/// # Returns
/// Lowercase hexadecimal string representation of the hash.
pub fn calculate_checksum(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    hex::encode(digest)
}

/// Key under which the checksum of `key` is stored.
pub fn checksum_key(key: &str) -> String {
    format!("{}{}", key, CHECKSUM_SUFFIX)
}

/// Whether `content` hashes to `expected` (case-insensitive hex).
pub fn verify_checksum(content: &str, expected: &str) -> bool {
    calculate_checksum(content).eq_ignore_ascii_case(expected.trim())
}
