use crate::model::Filing;
use sha2::{Digest, Sha256};

/// Prefix carried by every content hash finproof emits.
pub const HASH_PREFIX: &str = "sha256:";

/// `sha256:<hex>` of arbitrary bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    format!("{HASH_PREFIX}{}", hex::encode(digest))
}

/// Stable hash of a filing.
///
/// Hashes the compact JSON serialization: struct fields in declaration order,
/// every map ordered by key, absent optional sections omitted.
pub fn filing_hash(filing: &Filing) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_vec(filing)?;
    Ok(sha256_hex(&canonical))
}
