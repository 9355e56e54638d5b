//! In-memory stores for exercising stages without touching disk.
use super::{ObjectStore, RecordStore, StoreResult};
use crate::error::StoreError;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RefCell<BTreeMap<(String, String), Vec<u8>>>,
    copies: RefCell<usize>,
}

impl MemoryObjectStore {
    pub fn insert(&self, bucket: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        self.objects
            .borrow_mut()
            .insert((bucket.to_string(), key.to_string()), bytes.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn copy_count(&self) -> usize {
        *self.copies.borrow()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get(&self, bucket: &str, key: &str) -> StoreResult<Vec<u8>> {
        self.object(bucket, key).ok_or_else(|| StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> StoreResult<()> {
        let bytes = self.get(src_bucket, src_key)?;
        self.insert(dst_bucket, dst_key, bytes);
        *self.copies.borrow_mut() += 1;
        Ok(())
    }
}

/// Record store that can be told to fail on a specific record id.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: RefCell<BTreeMap<String, BTreeMap<String, Value>>>,
    puts: RefCell<usize>,
    fail_on: Option<String>,
}

impl MemoryRecordStore {
    pub fn failing_on(record_id: &str) -> Self {
        Self {
            fail_on: Some(record_id.to_string()),
            ..Self::default()
        }
    }

    pub fn put_count(&self) -> usize {
        *self.puts.borrow()
    }

    pub fn snapshot(&self, table: &str) -> BTreeMap<String, Value> {
        self.tables.borrow().get(table).cloned().unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn put(&self, table: &str, record_id: &str, record: &Value) -> StoreResult<()> {
        if self.fail_on.as_deref() == Some(record_id) {
            return Err(StoreError::Io {
                path: format!("memory://{table}/{record_id}").into(),
                source: std::io::Error::other("injected write failure"),
            });
        }
        *self.puts.borrow_mut() += 1;
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .insert(record_id.to_string(), record.clone());
        Ok(())
    }

    fn get(&self, table: &str, record_id: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .tables
            .borrow()
            .get(table)
            .and_then(|records| records.get(record_id))
            .cloned())
    }

    fn list(&self, table: &str) -> StoreResult<Vec<(String, Value)>> {
        Ok(self.snapshot(table).into_iter().collect())
    }
}
