//! Denormalization of orders against the reference snapshot.
use crate::model::{
    EnrichedRecord, OrderRecord, RecordStatus, ReferenceCache, UNKNOWN_NAME, UNKNOWN_PRICE,
};

// Written by enrichment; copies carried in the order itself are replaced.
const ENRICHED_FIELDS: [&str; 5] = [
    "record_id",
    "customer_name",
    "product_name",
    "price",
    "status",
];

/// Join one order with its customer and product.
///
/// Unresolved references fall back to `Unknown` / `0.00`: the snapshot used
/// here may differ from the one the validate stage saw.
pub fn enrich_record(record: &OrderRecord, cache: &ReferenceCache) -> EnrichedRecord {
    let customer_name = record
        .customer_id()
        .and_then(|id| cache.customer_name(id))
        .unwrap_or(UNKNOWN_NAME);
    let product = record.product_id().and_then(|id| cache.product(id));
    let (product_name, price) = product
        .map(|entry| (entry.name.as_str(), entry.price.as_str()))
        .unwrap_or((UNKNOWN_NAME, UNKNOWN_PRICE));

    EnrichedRecord {
        record_id: record.record_id().to_string(),
        order: record.without_fields(&ENRICHED_FIELDS),
        customer_name: customer_name.to_string(),
        product_name: product_name.to_string(),
        price: price.to_string(),
        status: RecordStatus::Processed,
    }
}

pub fn enrich_batch(records: &[OrderRecord], cache: &ReferenceCache) -> Vec<EnrichedRecord> {
    records
        .iter()
        .map(|record| enrich_record(record, cache))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{alice_widget_cache, order};
    use serde_json::json;

    #[test]
    fn joins_customer_and_product() {
        let record = order(json!({"order_id": "o1", "customer_id": "c1", "product_id": "p1"}));
        let enriched = enrich_record(&record, &alice_widget_cache());

        assert_eq!(
            serde_json::to_value(&enriched).expect("serialize"),
            json!({
                "record_id": "o1",
                "order_id": "o1",
                "customer_id": "c1",
                "product_id": "p1",
                "customer_name": "Alice",
                "product_name": "Widget",
                "price": "9.99",
                "status": "processed"
            })
        );
    }

    #[test]
    fn unresolved_references_fall_back() {
        let record = order(json!({"order_id": "o2", "customer_id": "c9", "product_id": "p9"}));
        let enriched = enrich_record(&record, &alice_widget_cache());

        assert_eq!(enriched.customer_name, "Unknown");
        assert_eq!(enriched.product_name, "Unknown");
        assert_eq!(enriched.price, "0.00");
        assert_eq!(enriched.status, RecordStatus::Processed);
    }

    #[test]
    fn missing_order_id_uses_sentinel_key() {
        let record = order(json!({"customer_id": "c1", "product_id": "p1"}));
        let enriched = enrich_record(&record, &alice_widget_cache());
        assert_eq!(enriched.record_id, "unknown");
    }

    #[test]
    fn passthrough_fields_survive_and_stale_enrichment_is_replaced() {
        let record = order(json!({
            "order_id": "o3",
            "customer_id": "c1",
            "product_id": "p1",
            "quantity": 2,
            "status": "pending",
            "price": 1.0
        }));
        let value = serde_json::to_value(enrich_record(&record, &alice_widget_cache()))
            .expect("serialize");

        assert_eq!(value["quantity"], json!(2));
        assert_eq!(value["status"], json!("processed"));
        assert_eq!(value["price"], json!("9.99"));
    }

    #[test]
    fn enrichment_is_deterministic_and_leaves_cache_untouched() {
        let cache = alice_widget_cache();
        let records = vec![
            order(json!({"order_id": "o1", "customer_id": "c1", "product_id": "p1", "note": "x"})),
            order(json!({"order_id": "o2", "customer_id": "c2", "product_id": "p1"})),
        ];
        let first = serde_json::to_vec(&enrich_batch(&records, &cache)).expect("serialize");
        let second = serde_json::to_vec(&enrich_batch(&records, &cache)).expect("serialize");

        assert_eq!(first, second);
        assert_eq!(cache, alice_widget_cache());
    }
}
