//! SHA-256 digests, lowercase hex.
//!
//! `sha256_canonical` hashes the canonical JSON form, so two inputs that differ
//! only in key order or whitespace share a digest.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::canonical_bytes_of;
use crate::IoError;

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(sha256_hex(&canonical_bytes_of(value)?))
}
