//! Content hashing for evaluation artefacts.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::ProofError;
use crate::serde_io::to_canonical_json_bytes;

/// Computes a stable hexadecimal SHA-256 over the canonical JSON of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, ProofError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
