//! Reference cache loading.
//!
//! Both datasets must load cleanly; partial reference data is never used.
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::model::{CustomerEntry, ProductEntry, ReferenceCache};
use crate::store::ObjectStore;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Source of the reference snapshot used by one stage invocation.
pub trait ReferenceLoader {
    fn load(&self, processing_bucket: &str) -> Result<ReferenceCache>;
}

/// Loads the customer directory and product catalog from staged objects.
pub struct StoreReferenceLoader<'a> {
    objects: &'a dyn ObjectStore,
    config: &'a PipelineConfig,
}

impl<'a> StoreReferenceLoader<'a> {
    pub fn new(objects: &'a dyn ObjectStore, config: &'a PipelineConfig) -> Self {
        Self { objects, config }
    }

    fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(bucket, key)
            .map_err(|err| reference_error(key, err))
    }
}

impl ReferenceLoader for StoreReferenceLoader<'_> {
    fn load(&self, processing_bucket: &str) -> Result<ReferenceCache> {
        let customers_key = &self.config.customers_key;
        let catalog_key = &self.config.catalog_key;
        let customers = parse_customers(
            customers_key,
            &self.fetch(processing_bucket, customers_key)?,
        )?;
        let products = parse_catalog(catalog_key, &self.fetch(processing_bucket, catalog_key)?)?;
        tracing::info!(
            bucket = processing_bucket,
            customers = customers.len(),
            products = products.len(),
            "reference data loaded"
        );
        Ok(ReferenceCache {
            customers,
            products,
        })
    }
}

/// Parse a JSON array of `{customer_id, name}` objects into a lookup.
pub fn parse_customers(key: &str, bytes: &[u8]) -> Result<BTreeMap<String, String>> {
    let entries: Vec<CustomerEntry> =
        serde_json::from_slice(bytes).map_err(|err| reference_error(key, err))?;
    let mut customers = BTreeMap::new();
    for entry in entries {
        if let Some(previous) = customers.insert(entry.customer_id.clone(), entry.name) {
            tracing::debug!(
                customer_id = %entry.customer_id,
                %previous,
                "duplicate customer entry; keeping the later one"
            );
        }
    }
    Ok(customers)
}

const CATALOG_COLUMNS: [&str; 3] = ["product_id", "name", "price"];

#[derive(Debug, Deserialize)]
struct CatalogRow {
    product_id: String,
    name: String,
    price: String,
}

/// Parse a CSV product catalog with a `product_id,name,price` header.
///
/// Extra columns are ignored; prices are kept as the literal cell text.
pub fn parse_catalog(key: &str, bytes: &[u8]) -> Result<BTreeMap<String, ProductEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|err| reference_error(key, err))?;
    let missing: Vec<&str> = CATALOG_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(reference_error(
            key,
            format!("header is missing column(s): {}", missing.join(", ")),
        ));
    }
    let mut products = BTreeMap::new();
    for row in reader.deserialize::<CatalogRow>() {
        let row = row.map_err(|err| reference_error(key, err))?;
        let entry = ProductEntry {
            name: row.name,
            price: row.price,
        };
        if products.insert(row.product_id.clone(), entry).is_some() {
            tracing::debug!(
                product_id = %row.product_id,
                "duplicate catalog row; keeping the later one"
            );
        }
    }
    Ok(products)
}

fn reference_error(key: &str, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::ReferenceData {
        key: key.to_string(),
        reason: err.to_string(),
    }
}
