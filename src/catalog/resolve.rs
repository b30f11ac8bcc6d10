use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::types::{HomeFeedItem, SpendBonusCategory};

/// Flat `cardKey -> cardName` lookup built from the nested catalog
#[derive(Debug, Clone, Default)]
pub struct CardNameIndex {
    names: HashMap<String, String>,
}

impl CardNameIndex {
    pub fn from_catalog(catalog: &[Value]) -> Self {
        let names = catalog
            .iter()
            .filter_map(|entry| entry.get("card").and_then(Value::as_array))
            .flatten()
            .filter_map(|card| {
                let key = card.get("cardKey")?.as_str()?;
                let name = card.get("cardName")?.as_str()?;
                Some((key.to_string(), name.to_string()))
            })
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name for a key, or the key itself when the catalog does not know it
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.names.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Decode raw feed items and swap each card key for its catalog name.
/// Items that are not objects with a string `cardName` are dropped; a bad
/// category is dropped on its own and a missing or non-list category field
/// reads as empty.
pub fn resolve_feed(raw_items: &[Value], index: &CardNameIndex) -> Vec<HomeFeedItem> {
    raw_items
        .iter()
        .enumerate()
        .filter_map(|(pos, raw)| {
            let Some(key) = raw.get("cardName").and_then(Value::as_str) else {
                debug!("Skipping home feed item {}: no cardName", pos);
                return None;
            };

            let spend_bonus_categories = raw
                .get("spendBonusCategories")
                .and_then(Value::as_array)
                .map(|categories| decode_categories(key, categories))
                .unwrap_or_default();

            Some(HomeFeedItem {
                card_name: index.resolve(key).to_string(),
                spend_bonus_categories,
            })
        })
        .collect()
}

fn decode_categories(card_key: &str, categories: &[Value]) -> Vec<SpendBonusCategory> {
    categories
        .iter()
        .filter_map(|raw| match serde_json::from_value::<SpendBonusCategory>(raw.clone()) {
            Ok(category) => Some(category),
            Err(e) => {
                debug!("Dropping malformed bonus category for '{}': {}", card_key, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index() -> CardNameIndex {
        CardNameIndex::from_catalog(&[
            json!({
                "cardIssuer": "American Express",
                "card": [{"cardKey": "amex-gold", "cardName": "American Express® Gold"}]
            }),
            json!({"cardIssuer": "Broken", "card": {"cardKey": "x"}}),
            json!({
                "cardIssuer": "Discover",
                "card": [{"cardKey": "discover-it", "cardName": "Discover It® Student Cash Back"}, {"cardKey": 3}]
            }),
        ])
    }

    #[test]
    fn known_key_resolves_unknown_key_passes_through() {
        let index = index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("amex-gold"), "American Express® Gold");
        assert_eq!(index.resolve("chase-sapphire"), "chase-sapphire");
    }

    #[test]
    fn feed_items_get_display_names() {
        let raw = vec![
            json!({
                "cardName": "amex-gold",
                "spendBonusCategories": [
                    {"spendBonusCategoryName": "Dining", "spendBonusDesc": "4x at restaurants worldwide"}
                ]
            }),
            json!({
                "cardName": "unknown-card",
                "spendBonusCategories": [{"spendBonusDesc": "1% on everything"}]
            }),
            json!({"spendBonusCategories": []}),
            json!(null),
        ];

        let feed = resolve_feed(&raw, &index());
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].card_name, "American Express® Gold");
        assert_eq!(
            feed[0].spend_bonus_categories[0].spend_bonus_category_name.as_deref(),
            Some("Dining")
        );
        assert_eq!(feed[1].card_name, "unknown-card");
        assert_eq!(feed[1].spend_bonus_categories[0].spend_bonus_category_name, None);
    }

    #[test]
    fn bad_category_only_drops_itself() {
        let raw = vec![
            json!({
                "cardName": "amex-gold",
                "spendBonusCategories": [
                    {"spendBonusCategoryName": "Dining", "spendBonusDesc": "4x at restaurants worldwide"},
                    {"spendBonusCategoryName": "Travel"}
                ]
            }),
            json!({"cardName": "chase-sapphire", "spendBonusCategories": null}),
            json!({"cardName": "discover-it", "spendBonusCategories": "n/a"}),
        ];

        let feed = resolve_feed(&raw, &index());
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].spend_bonus_categories.len(), 1);
        assert_eq!(
            feed[0].spend_bonus_categories[0].spend_bonus_desc,
            "4x at restaurants worldwide"
        );
        assert_eq!(feed[1].card_name, "chase-sapphire");
        assert!(feed[1].spend_bonus_categories.is_empty());
        assert_eq!(feed[2].card_name, "Discover It® Student Cash Back");
        assert!(feed[2].spend_bonus_categories.is_empty());
    }

    #[test]
    fn empty_catalog_keeps_raw_keys() {
        let feed = resolve_feed(&[json!({"cardName": "amex-gold"})], &CardNameIndex::default());
        assert_eq!(feed[0].card_name, "amex-gold");
        assert!(feed[0].spend_bonus_categories.is_empty());
    }
}
