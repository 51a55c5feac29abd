//! Normalization of raw fetched payloads into the canonical shape.
//!
//! Raw payloads come from sources we do not control: keys may be missing or
//! spelled differently (`gear` vs `gears`), categories may not be arrays, and
//! individual entries may have the wrong type. Normalization never fails; it
//! drops what it cannot use and always yields all three categories.

use crate::error::{Result, StockError};
use crate::types::{Category, ItemShape, Payload};
use serde_json::Value;
use tracing::debug;

/// Normalize any JSON value into a canonical payload.
///
/// Non-object input yields the all-empty payload.
pub fn normalize<T: ItemShape>(raw: &Value) -> Payload<T> {
    match try_normalize(raw) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("normalize: {e}, using empty payload");
            Payload::empty()
        }
    }
}

/// Like [`normalize`], but reports a non-object input instead of hiding it.
///
/// Used by the ingest endpoint, which must reject malformed bodies.
pub fn try_normalize<T: ItemShape>(raw: &Value) -> Result<Payload<T>> {
    let obj = raw
        .as_object()
        .ok_or_else(|| StockError::NotAMapping(json_type(raw)))?;

    let mut payload = Payload::empty();
    for category in Category::ALL {
        let found = category
            .aliases()
            .iter()
            .find_map(|alias| obj.get(*alias).map(|v| (*alias, v)));

        let entries = match found {
            Some((_, Value::Array(entries))) => entries,
            Some((alias, other)) => {
                debug!(
                    "normalize: `{alias}` is {} not an array, treating {category} as empty",
                    json_type(other)
                );
                continue;
            }
            None => {
                debug!("normalize: no key for {category}, treating as empty");
                continue;
            }
        };

        let items: Vec<T> = entries.iter().filter_map(T::from_raw).collect();
        let dropped = entries.len() - items.len();
        if dropped > 0 {
            debug!(
                "normalize: dropped {dropped} malformed {} entries from {category}",
                T::SHAPE
            );
        }
        *payload.get_mut(category) = items;
    }

    Ok(payload)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StockItem;
    use serde_json::json;

    #[test]
    fn test_non_mapping_yields_empty() {
        for raw in [json!(null), json!([1, 2]), json!("gear"), json!(7)] {
            let p: Payload<String> = normalize(&raw);
            assert_eq!(p, Payload::empty());
        }
        assert_eq!(
            try_normalize::<String>(&json!([])),
            Err(StockError::NotAMapping("an array"))
        );
    }

    #[test]
    fn test_gear_aliases_agree() {
        let a: Payload<String> = normalize(&json!({"gear": ["Trowel **x2**"]}));
        let b: Payload<String> = normalize(&json!({"gears": ["Trowel **x2**"]}));
        assert_eq!(a.gear, b.gear);
        assert_eq!(a.gear, vec!["Trowel **x2**".to_string()]);
    }

    #[test]
    fn test_alias_keys_are_case_sensitive() {
        let p: Payload<String> = normalize(&json!({"Egg": ["Bug Egg **x1**"], "SEEDS": ["Corn"]}));
        assert!(p.is_empty());

        let p: Payload<String> = normalize(&json!({"egg": ["Bug Egg **x1**"]}));
        assert_eq!(p.eggs, vec!["Bug Egg **x1**".to_string()]);
    }

    #[test]
    fn test_canonical_key_wins_over_alias() {
        let p: Payload<String> = normalize(&json!({"gears": ["Old"], "gear": ["New"]}));
        assert_eq!(p.gear, vec!["New".to_string()]);
    }

    #[test]
    fn test_non_string_entries_dropped() {
        let p: Payload<String> = normalize(&json!({"seeds": ["Carrot", 42, null, "Corn"]}));
        assert_eq!(p.seeds, vec!["Carrot".to_string(), "Corn".to_string()]);
        assert!(p.gear.is_empty());
        assert!(p.eggs.is_empty());
    }

    #[test]
    fn test_non_array_category_defaults_empty() {
        let p: Payload<String> = normalize(&json!({"eggs": "Bug Egg", "seeds": ["Corn"]}));
        assert!(p.eggs.is_empty());
        assert_eq!(p.seeds.len(), 1);
    }

    #[test]
    fn test_structured_items_need_name_and_quantity() {
        let raw = json!({
            "gears": [
                {"name": "Trowel", "quantity": "x2"},
                {"name": "Sprinkler"},
                "Rake",
                {"quantity": "x1"}
            ],
            "egg": [{"name": "Bug Egg", "quantity": "x1"}]
        });
        let p: Payload<StockItem> = normalize(&raw);
        assert_eq!(p.gear, vec![StockItem::new("Trowel", "x2")]);
        assert_eq!(p.eggs, vec![StockItem::new("Bug Egg", "x1")]);
        assert!(p.seeds.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let p: Payload<String> = normalize(&json!({"seeds": ["Tomato", "Apple", "Corn"]}));
        assert_eq!(p.seeds, vec!["Tomato", "Apple", "Corn"]);
    }
}
