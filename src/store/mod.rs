//! Capability interfaces for the object store and the durable record store.
//!
//! Stages receive these as trait objects so local filesystem backends and
//! in-memory fakes are interchangeable.
use crate::error::StoreError;
use serde_json::Value;

mod fs;
#[cfg(test)]
pub(crate) mod memory;

pub use fs::{FsObjectStore, FsRecordStore};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Bucket/key addressed blob storage holding landed and staged files.
pub trait ObjectStore {
    fn get(&self, bucket: &str, key: &str) -> StoreResult<Vec<u8>>;

    /// Copy an object byte-for-byte, overwriting any existing destination.
    fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> StoreResult<()>;
}

/// Table-like key-value store with last-write-wins upserts.
pub trait RecordStore {
    fn put(&self, table: &str, record_id: &str, record: &Value) -> StoreResult<()>;

    fn get(&self, table: &str, record_id: &str) -> StoreResult<Option<Value>>;

    /// All records in the table, ordered by record id.
    fn list(&self, table: &str) -> StoreResult<Vec<(String, Value)>>;
}
