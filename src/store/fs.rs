//! Filesystem-backed stores rooted at a single directory.
//!
//! Buckets map to `<root>/<bucket>/` and tables to `<root>/tables/<table>/`,
//! one JSON file per record. Every write lands through a temp file and an
//! atomic rename so readers never observe a partial object.
use super::{ObjectStore, RecordStore, StoreResult};
use crate::error::StoreError;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

const RECORD_EXT: &str = "json";
// File names cap at 255 bytes; leave room for the extension.
const MAX_RECORD_STEM: usize = 255 - RECORD_EXT.len() - 1;

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn object_path(&self, bucket: &str, key: &str) -> StoreResult<PathBuf> {
        validate_segment(bucket)?;
        validate_relative_key(key)?;
        Ok(self.root.join(bucket).join(key))
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, bucket: &str, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> StoreResult<()> {
        let bytes = self.get(src_bucket, src_key)?;
        let dest = self.object_path(dst_bucket, dst_key)?;
        write_atomic(&dest, &bytes)
    }
}

/// Tables as directories of `<escaped record id>.json` files.
///
/// The escaped id must fit in one file name: at most 250 bytes after
/// escaping, so roughly 83 bytes of non-ASCII text. Longer ids are rejected
/// as [`StoreError::InvalidKey`] before anything is written.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn table_dir(&self, table: &str) -> StoreResult<PathBuf> {
        validate_segment(table)?;
        Ok(self.root.join("tables").join(table))
    }

    fn record_path(&self, table: &str, record_id: &str) -> StoreResult<PathBuf> {
        let stem = escape_record_id(record_id);
        if stem.len() > MAX_RECORD_STEM {
            return Err(StoreError::InvalidKey(record_id.to_string()));
        }
        Ok(self.table_dir(table)?.join(format!("{stem}.{RECORD_EXT}")))
    }
}

impl RecordStore for FsRecordStore {
    fn put(&self, table: &str, record_id: &str, record: &Value) -> StoreResult<()> {
        let path = self.record_path(table, record_id)?;
        let bytes = serde_json::to_vec_pretty(record)?;
        if fs::read(&path).is_ok_and(|existing| existing == bytes) {
            tracing::debug!(record_id, "record unchanged; skipping write");
            return Ok(());
        }
        write_atomic(&path, &bytes)
    }

    fn get(&self, table: &str, record_id: &str) -> StoreResult<Option<Value>> {
        let path = self.record_path(table, record_id)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn list(&self, table: &str) -> StoreResult<Vec<(String, Value)>> {
        let dir = self.table_dir(table)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };
        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            let Some(record_id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(unescape_record_id)
            else {
                continue;
            };
            let bytes = fs::read(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            records.push((record_id, serde_json::from_slice(&bytes)?));
        }
        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }
}

fn write_atomic(dest: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let io_err = |source| StoreError::Io {
        path: dest.to_path_buf(),
        source,
    };
    fs::create_dir_all(parent).map_err(io_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.persist(dest).map_err(|err| io_err(err.error))?;
    Ok(())
}

fn validate_segment(name: &str) -> StoreResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StoreError::InvalidKey(name.to_string()));
    }
    Ok(())
}

fn validate_relative_key(key: &str) -> StoreResult<()> {
    let path = Path::new(key);
    let escapes = path
        .components()
        .any(|component| !matches!(component, Component::Normal(_)));
    if key.is_empty() || escapes {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Encode a record id as a file stem: `[A-Za-z0-9_-]` pass through, every
/// other byte becomes `%XX`.
fn escape_record_id(record_id: &str) -> String {
    let mut escaped = String::with_capacity(record_id.len());
    for byte in record_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

fn unescape_record_id(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut iter = stem.bytes();
    while let Some(byte) = iter.next() {
        if byte == b'%' {
            let hi = (iter.next()? as char).to_digit(16)?;
            let lo = (iter.next()? as char).to_digit(16)?;
            bytes.push((hi * 16 + lo) as u8);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok()
}
