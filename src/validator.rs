//! Order validation against required fields and the reference snapshot.
//!
//! Every rule runs for every record; defects accumulate and the batch is
//! accepted only when none were found.
use crate::error::{PipelineError, Result};
use crate::model::{OrderRecord, ReferenceCache};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectKind {
    MissingRequiredField,
    InvalidCustomerId,
    InvalidProductId,
}

impl DefectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing required field",
            Self::InvalidCustomerId => "invalid customer_id",
            Self::InvalidProductId => "invalid product_id",
        }
    }
}

/// One violated rule on one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Defect {
    /// 0-based position of the record in the parsed batch.
    pub index: usize,
    pub order_id: Option<String>,
    pub kind: DefectKind,
    pub detail: String,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.order_id.as_deref().unwrap_or("<no order_id>");
        write!(
            f,
            "record {} ({order}): {}: {}",
            self.index,
            self.kind.as_str(),
            self.detail
        )
    }
}

/// Check every record; never short-circuits.
pub fn validate_batch(records: &[OrderRecord], cache: &ReferenceCache) -> Vec<Defect> {
    records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| validate_record(index, record, cache))
        .collect()
}

fn validate_record(index: usize, record: &OrderRecord, cache: &ReferenceCache) -> Vec<Defect> {
    let mut defects = Vec::new();
    let mut push = |kind, detail: String| {
        defects.push(Defect {
            index,
            order_id: record.order_id().map(str::to_string),
            kind,
            detail,
        })
    };

    // A missing id is reported once; the lookup rule needs a value to check.
    match record.customer_id() {
        None => push(DefectKind::MissingRequiredField, "customer_id".to_string()),
        Some(id) if cache.customer_name(id).is_none() => {
            push(DefectKind::InvalidCustomerId, id.to_string())
        }
        Some(_) => {}
    }
    match record.product_id() {
        None => push(DefectKind::MissingRequiredField, "product_id".to_string()),
        Some(id) if cache.product(id).is_none() => {
            push(DefectKind::InvalidProductId, id.to_string())
        }
        Some(_) => {}
    }
    defects
}

/// Reject the batch when any defect exists.
///
/// Each defect is logged for diagnosis; the raised error carries only the count.
pub fn ensure_valid(filename: &str, defects: &[Defect]) -> Result<()> {
    if defects.is_empty() {
        return Ok(());
    }
    for defect in defects {
        tracing::warn!(filename, %defect, "validation defect");
    }
    Err(PipelineError::ValidationFailed {
        filename: filename.to_string(),
        defects: defects.len(),
    })
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
