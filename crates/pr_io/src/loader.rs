//! crates/pr_io/src/loader.rs
//! Load district configurations from a local JSON file.
//!
//! Accepted shapes:
//! - a bare array of districts: `[ {"seats": 5, "parties": [...]}, ... ]`
//! - a document: `{ "districts": [...], "methods": [...]?, "options": {...}? }`
//!
//! Every district is validated on load; the first invalid one is reported with
//! its index and a JSON Pointer.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use pr_core::{AllocOptions, DistrictConfig, Method};

use crate::hasher::sha256_canonical;
use crate::{looks_like_url_strict, IoError, IoResult};

/// Inputs larger than this are refused before parsing.
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

/// A validated batch of districts plus anything the document carried with it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictSet {
    pub districts: Vec<DistrictConfig>,
    /// Methods named in the document, in document order. Empty for bare arrays.
    pub methods: Vec<Method>,
    /// Options named in the document; defaults for bare arrays.
    pub options: AllocOptions,
    /// SHA-256 of the canonical JSON form of the input.
    pub input_sha256: String,
    pub source: Option<PathBuf>,
}

/// Read, parse and validate `path`.
pub fn load_districts(path: &Path) -> IoResult<DistrictSet> {
    let shown = path.to_string_lossy();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Path(format!("URLs are not allowed: {shown}")));
    }

    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let len = f.metadata()?.len();
    if len > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!(
            "{} is {len} bytes; limit is {MAX_INPUT_BYTES}",
            path.display()
        )));
    }

    let mut bytes = Vec::with_capacity(len as usize);
    f.take(MAX_INPUT_BYTES + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!("{} grew past the input limit", path.display())));
    }

    let mut set = parse_districts(&bytes)?;
    set.source = Some(path.to_path_buf());
    tracing::debug!(
        path = %path.display(),
        districts = set.districts.len(),
        sha256 = %set.input_sha256,
        "loaded districts"
    );
    Ok(set)
}

/// Parse and validate an in-memory JSON document.
pub fn parse_districts(bytes: &[u8]) -> IoResult<DistrictSet> {
    let root: Value = serde_json::from_slice(bytes)?;
    let input_sha256 = sha256_canonical(&root)?;

    let (districts_value, base, methods, options) = match root {
        Value::Array(_) => (root, "", Vec::new(), AllocOptions::default()),
        Value::Object(mut map) => {
            let districts = map.remove("districts").ok_or_else(|| IoError::Json {
                pointer: "/districts".into(),
                msg: "missing field `districts`".into(),
            })?;
            let methods = match map.remove("methods") {
                Some(v) => from_value_at::<Vec<Method>>(v, "/methods")?,
                None => Vec::new(),
            };
            let options = match map.remove("options") {
                Some(v) => from_value_at::<AllocOptions>(v, "/options")?,
                None => AllocOptions::default(),
            };
            (districts, "/districts", methods, options)
        }
        _ => {
            return Err(IoError::Json {
                pointer: "/".into(),
                msg: "expected an array of districts or an object with `districts`".into(),
            })
        }
    };

    let Value::Array(items) = districts_value else {
        return Err(IoError::Json {
            pointer: if base.is_empty() { "/".into() } else { base.into() },
            msg: "expected an array".into(),
        });
    };
    if items.is_empty() {
        return Err(IoError::Invalid("no districts in input".into()));
    }

    let mut districts = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let pointer = format!("{base}/{i}");
        let district: DistrictConfig = from_value_at(item, &pointer)?;
        district
            .validate()
            .map_err(|e| IoError::Invalid(format!("district at {pointer}: {e}")))?;
        districts.push(district);
    }
    if let Some(b) = options.barrier {
        if !(0.0..=1.0).contains(&b) {
            return Err(IoError::Invalid(format!("options.barrier {b} outside [0, 1]")));
        }
    }

    Ok(DistrictSet {
        districts,
        methods,
        options,
        input_sha256,
        source: None,
    })
}

fn from_value_at<T: DeserializeOwned>(v: Value, pointer: &str) -> IoResult<T> {
    serde_json::from_value(v).map_err(|e| IoError::Json {
        pointer: pointer.to_string(),
        msg: e.to_string(),
    })
}
