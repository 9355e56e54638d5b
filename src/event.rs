//! File-landed events and filename classification.
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Location of a landed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLanded {
    pub bucket: String,
    pub key: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEvent {
    Direct { bucket: String, key: String },
    Wrapped { detail: RawDetail },
}

#[derive(Deserialize)]
struct RawDetail {
    bucket: RawBucket,
    object: RawObject,
}

#[derive(Deserialize)]
struct RawBucket {
    name: String,
}

#[derive(Deserialize)]
struct RawObject {
    key: String,
}

impl FileLanded {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Accept either `{bucket, key}` or `{detail: {bucket: {name}, object: {key}}}`.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawEvent = serde_json::from_value(value).map_err(|_| {
            PipelineError::InvalidEvent("missing 'bucket' and 'key' fields".to_string())
        })?;
        Ok(match raw {
            RawEvent::Direct { bucket, key } => Self { bucket, key },
            RawEvent::Wrapped { detail } => Self {
                bucket: detail.bucket.name,
                key: detail.object.key,
            },
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| PipelineError::InvalidEvent(format!("not JSON: {err}")))?;
        Self::from_value(value)
    }

    /// Final path segment of the key.
    pub fn filename(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Customers,
    Catalog,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customer directory",
            Self::Catalog => "product catalog",
        }
    }
}

/// What a landed file is, decided once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    ReferenceFile(ReferenceKind),
    OrderBatch,
    Unrecognized,
}

impl FileKind {
    pub fn classify(filename: &str, config: &PipelineConfig) -> Self {
        if filename == config.customers_key {
            Self::ReferenceFile(ReferenceKind::Customers)
        } else if filename == config.catalog_key {
            Self::ReferenceFile(ReferenceKind::Catalog)
        } else if filename.starts_with(&config.order_prefix)
            && filename.ends_with(&config.order_suffix)
        {
            Self::OrderBatch
        } else {
            Self::Unrecognized
        }
    }
}
