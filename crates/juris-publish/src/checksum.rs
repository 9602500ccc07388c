//! SHA-256 session checksums.
//!
//! The checksum is the idempotency key for staging: a client retry after a
//! timeout re-sends the same checksum and the store reconciles instead of
//! duplicating rows.

use juris_model::NormalizedBatch;
use sha2::{Digest, Sha256};

/// Hashes raw workbook bytes. Used as the `ImportSession` id.
pub fn bytes_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hashes the canonical serialized batch together with the file name.
///
/// Serialization of the batch is deterministic (struct field order), so the
/// same normalized content always produces the same checksum.
pub fn batch_checksum(file_name: &str, batch: &NormalizedBatch) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update([0u8]);
    // Infallible for these types; fall back to the empty document only if
    // serde_json ever fails on plain structs.
    let body = serde_json::to_vec(batch).unwrap_or_default();
    hasher.update(&body);
    hex::encode(hasher.finalize())
}
