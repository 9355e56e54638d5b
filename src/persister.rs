//! Durable writes of enriched records, keyed by record id.
use crate::error::{PipelineError, Result, StoreError};
use crate::model::{EnrichedRecord, UNKNOWN_RECORD_ID};
use crate::store::RecordStore;

/// Upsert one record. Same key and content twice leaves the store unchanged.
pub fn persist_record(
    store: &dyn RecordStore,
    table: &str,
    record: &EnrichedRecord,
) -> std::result::Result<(), StoreError> {
    if record.record_id == UNKNOWN_RECORD_ID {
        tracing::warn!(table, "order has no order_id; persisting under sentinel key");
    }
    let value = serde_json::to_value(record)?;
    store.put(table, &record.record_id, &value)
}

/// Upsert every record in order, stopping at the first failed write.
///
/// Records written before the failure stay in place; replaying the whole
/// batch is the recovery path.
pub fn persist_batch(
    store: &dyn RecordStore,
    table: &str,
    records: &[EnrichedRecord],
) -> Result<usize> {
    for (persisted, record) in records.iter().enumerate() {
        persist_record(store, table, record).map_err(|source| PipelineError::Persist {
            record_id: record.record_id.clone(),
            persisted,
            source,
        })?;
    }
    tracing::info!(table, records = records.len(), "records persisted");
    Ok(records.len())
}
