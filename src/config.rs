//! Pipeline configuration.
//!
//! Naming conventions for buckets, reference objects, and order batches live
//! here so the stages never hard-code them.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current schema version for the pipeline config file.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub schema_version: u32,
    /// Bucket-name fragment identifying the landing area.
    pub landing_marker: String,
    /// Replacement for `landing_marker` that yields the processing bucket.
    pub processing_marker: String,
    pub customers_key: String,
    pub catalog_key: String,
    pub order_prefix: String,
    pub order_suffix: String,
    /// Record-store table that receives enriched orders.
    pub table: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            landing_marker: "input".to_string(),
            processing_marker: "processing".to_string(),
            customers_key: "customers.json".to_string(),
            catalog_key: "product_catalog.csv".to_string(),
            order_prefix: "customer_orders_".to_string(),
            order_suffix: ".jsonl".to_string(),
            table: "customer-data-pipeline-metadata-db".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Derive the processing bucket that holds staged reference files.
    pub fn processing_bucket(&self, landing_bucket: &str) -> String {
        landing_bucket.replace(&self.landing_marker, &self.processing_marker)
    }
}

/// Load a config from disk, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: PipelineConfig =
        serde_json::from_slice(&bytes).context("parse pipeline config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate schema version and naming fields.
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported pipeline config schema_version {}",
            config.schema_version
        ));
    }
    let fields = [
        ("landing_marker", &config.landing_marker),
        ("processing_marker", &config.processing_marker),
        ("customers_key", &config.customers_key),
        ("catalog_key", &config.catalog_key),
        ("order_prefix", &config.order_prefix),
        ("order_suffix", &config.order_suffix),
        ("table", &config.table),
    ];
    for (label, value) in fields {
        if value.trim().is_empty() {
            return Err(anyhow!("{label} must be non-empty"));
        }
    }
    for (label, key) in [
        ("customers_key", &config.customers_key),
        ("catalog_key", &config.catalog_key),
    ] {
        if key.contains('/') {
            return Err(anyhow!(
                "{label} must be a bare object name without '/' (got {key:?})"
            ));
        }
    }
    Ok(())
}
