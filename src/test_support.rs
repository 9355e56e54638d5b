//! Fixtures shared by unit tests.
use crate::model::{OrderRecord, ProductEntry, ReferenceCache};
use serde_json::Value;

pub const CUSTOMERS_JSON: &str = r#"[{"customer_id":"c1","name":"Alice"}]"#;
pub const CATALOG_CSV: &str = "product_id,name,price\np1,Widget,9.99\n";

/// Customer `c1` (Alice) and product `p1` (Widget, 9.99).
pub fn alice_widget_cache() -> ReferenceCache {
    let mut cache = ReferenceCache::default();
    cache.customers.insert("c1".to_string(), "Alice".to_string());
    cache.products.insert(
        "p1".to_string(),
        ProductEntry {
            name: "Widget".to_string(),
            price: "9.99".to_string(),
        },
    );
    cache
}

pub fn order(value: Value) -> OrderRecord {
    serde_json::from_value(value).expect("order fixture must be a JSON object")
}
