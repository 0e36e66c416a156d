//! Canonical JSON utilities
//! - Objects: keys sorted lexicographically (UTF-8 byte order)
//! - Arrays: order preserved (caller is responsible for stable ordering)
//! - Output: compact (no extra spaces, no trailing newline)
//! - Atomic write: temp file in the same dir + fsync + rename; direct write if the
//!   rename fails (e.g. cross-device)

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::IoError;

/// Canonical bytes of a JSON value.
pub fn to_canonical_json_bytes(v: &Value) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::with_capacity(1024);
    write_canonical_value(v, &mut out)?;
    Ok(out)
}

/// Canonical bytes of any serializable value.
pub fn canonical_bytes_of<T: Serialize>(value: &T) -> Result<Vec<u8>, IoError> {
    to_canonical_json_bytes(&serde_json::to_value(value)?)
}

/// Serialize `value` canonically and write it to `path` atomically.
pub fn write_canonical_file<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    let bytes = canonical_bytes_of(value)?;
    write_atomic(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote canonical json");
    Ok(())
}

fn write_canonical_value(v: &Value, out: &mut Vec<u8>) -> Result<(), IoError> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => serde_json::to_writer(&mut *out, s)?,
        Value::Array(arr) => {
            out.push(b'[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical_value(elem, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (i, (k, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, k)?;
                out.push(b':');
                write_canonical_value(val, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let tmp = unique_tmp_path(path);
    let mut tf = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
    tf.write_all(bytes)?;
    tf.sync_all()?;
    drop(tf);

    if fs::rename(&tmp, path).is_err() {
        let direct = (|| -> io::Result<()> {
            let mut f = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            f.write_all(bytes)?;
            f.sync_all()
        })();
        let _ = fs::remove_file(&tmp);
        direct?;
    }
    let _ = fsync_dir(&parent);
    Ok(())
}

/// "<filename>.<pid>.<counter>.tmp" next to `target`.
fn unique_tmp_path(target: &Path) -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let fname = target.file_name().and_then(|s| s.to_str()).unwrap_or("file");
    target.with_file_name(format!("{fname}.{}.{n}.tmp", std::process::id()))
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    OpenOptions::new().read(true).open(dir)?.sync_all()
}

#[cfg(not(unix))]
#[inline]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
