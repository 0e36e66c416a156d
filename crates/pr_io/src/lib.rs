//! crates/pr_io/src/lib.rs
//! Local, offline I/O for the apportionment engine.
//!
//! - `loader`: district configurations from a JSON file (validated on load)
//! - `canonical_json`: sorted-key compact JSON and atomic file writes
//! - `hasher`: SHA-256 digests of raw bytes and canonical JSON

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod canonical_json;
pub mod hasher;
pub mod loader;

pub use loader::{load_districts, parse_districts, DistrictSet, MAX_INPUT_BYTES};

#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, read, create_dir_all, rename).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON syntax or shape errors, with a JSON Pointer to the offending node.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Input parsed but violates a district invariant.
    #[error("invalid: {0}")]
    Invalid(String),

    /// Input larger than `MAX_INPUT_BYTES`.
    #[error("limit: {0}")]
    Limit(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}
