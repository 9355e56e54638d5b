//! Record types shared by the pipeline stages.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Persistence key used when an order carries no `order_id`.
pub const UNKNOWN_RECORD_ID: &str = "unknown";
/// Fallback display value for unresolved customer or product names.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Fallback price for unresolved products.
pub const UNKNOWN_PRICE: &str = "0.00";

/// One parsed order line. Fields other than the three identifiers pass
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRecord {
    fields: Map<String, Value>,
}

impl OrderRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn order_id(&self) -> Option<&str> {
        self.string_field("order_id")
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.string_field("customer_id")
    }

    pub fn product_id(&self) -> Option<&str> {
        self.string_field("product_id")
    }

    /// Key under which the enriched record is persisted.
    pub fn record_id(&self) -> &str {
        self.order_id().unwrap_or(UNKNOWN_RECORD_ID)
    }

    /// Copy of this record with the named fields dropped.
    pub fn without_fields(&self, names: &[&str]) -> Self {
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| !names.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self { fields }
    }

    // Only non-blank strings count as present.
    fn string_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerEntry {
    pub customer_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEntry {
    pub name: String,
    /// Kept verbatim from the catalog; never parsed to a float.
    pub price: String,
}

/// In-memory snapshot of both reference datasets for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCache {
    pub customers: BTreeMap<String, String>,
    pub products: BTreeMap<String, ProductEntry>,
}

impl ReferenceCache {
    pub fn customer_name(&self, customer_id: &str) -> Option<&str> {
        self.customers.get(customer_id).map(String::as_str)
    }

    pub fn product(&self, product_id: &str) -> Option<&ProductEntry> {
        self.products.get(product_id)
    }
}

/// Processing status written with every enriched record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Processed,
}

/// An order joined with its denormalized reference fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub record_id: String,
    #[serde(flatten)]
    pub order: OrderRecord,
    pub customer_name: String,
    pub product_name: String,
    pub price: String,
    pub status: RecordStatus,
}

/// Summary handed back to the orchestrator after a stage completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Validated { records: usize, filename: String },
    Transformed { records: usize, filename: String },
    ReferenceFileMoved { filename: String },
    Skipped { filename: String },
}

impl StageOutcome {
    pub fn records(&self) -> Option<usize> {
        match self {
            Self::Validated { records, .. } | Self::Transformed { records, .. } => Some(*records),
            Self::ReferenceFileMoved { .. } | Self::Skipped { .. } => None,
        }
    }
}
