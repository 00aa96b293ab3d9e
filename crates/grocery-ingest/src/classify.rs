//! Decides once, at ingestion, whether a raw record is a product or a store.

use grocery_core::RecordKind;
use serde_json::{Map, Value};

use crate::error::Rejection;

/// Classifies a raw record by key presence.
///
/// A record with both `street` and `picks_up_in_shop` is a store; otherwise a
/// record with both `price` and `localization` is a product. The store check
/// runs first, matching the order the mixed batch files were written in.
///
/// # Errors
///
/// Returns [`Rejection::Unclassified`] when neither key pair is present.
pub fn classify(record: &Map<String, Value>) -> Result<RecordKind, Rejection> {
    let has = |key: &str| record.contains_key(key);

    if has("street") && has("picks_up_in_shop") {
        Ok(RecordKind::Store)
    } else if has("price") && has("localization") {
        Ok(RecordKind::Product)
    } else {
        Err(Rejection::Unclassified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn store_needs_street_and_pickup_flag() {
        let record = obj(json!({"name": "pim", "street": "Via Roma 1", "picks_up_in_shop": "True"}));
        assert_eq!(classify(&record), Ok(RecordKind::Store));
    }

    #[test]
    fn null_street_still_marks_a_store() {
        let record = obj(json!({"name": "pim", "street": null, "picks_up_in_shop": false}));
        assert_eq!(classify(&record), Ok(RecordKind::Store));
    }

    #[test]
    fn product_needs_price_and_localization() {
        let record = obj(json!({"full_name": "Banane", "price": "2,49", "localization": {}}));
        assert_eq!(classify(&record), Ok(RecordKind::Product));
    }

    #[test]
    fn store_wins_when_both_pairs_present() {
        let record = obj(json!({
            "street": "Via Roma 1", "picks_up_in_shop": true,
            "price": 1.0, "localization": {}
        }));
        assert_eq!(classify(&record), Ok(RecordKind::Store));
    }

    #[test]
    fn half_a_pair_is_unclassified() {
        assert_eq!(
            classify(&obj(json!({"street": "Via Roma 1", "lat": 41.9}))),
            Err(Rejection::Unclassified)
        );
        assert_eq!(
            classify(&obj(json!({"price": 2.0, "name": "Latte"}))),
            Err(Rejection::Unclassified)
        );
    }
}
