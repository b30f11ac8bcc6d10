use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::types::{CardCatalogEntry, CatalogCard};

/// Why a raw catalog entry was left out of the grouped view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotAnObject,
    MissingIssuer,
    CardsNotAList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Position in the catalog as fetched
    pub index: usize,
    pub reason: SkipReason,
}

/// Outcome of validating one raw catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryCheck {
    Valid(CardCatalogEntry),
    Skipped(SkippedEntry),
}

/// Issuer sections for display plus the entries that could not be shown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedCatalog {
    pub sections: Vec<CardCatalogEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl GroupedCatalog {
    pub fn issuer_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.card_issuer.as_str()).collect()
    }

    pub fn card_count(&self) -> usize {
        self.sections.iter().map(|s| s.card.len()).sum()
    }
}

/// Validate a raw entry; cards lacking a key or name are dropped from a valid entry
pub fn check_entry(index: usize, entry: &Value) -> EntryCheck {
    let skipped = |reason| EntryCheck::Skipped(SkippedEntry { index, reason });

    let Some(object) = entry.as_object() else {
        return skipped(SkipReason::NotAnObject);
    };

    let issuer = match object.get("cardIssuer").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name,
        _ => return skipped(SkipReason::MissingIssuer),
    };

    let Some(cards) = object.get("card").and_then(Value::as_array) else {
        return skipped(SkipReason::CardsNotAList);
    };

    let card = cards
        .iter()
        .filter_map(|card| match serde_json::from_value::<CatalogCard>(card.clone()) {
            Ok(card) => Some(card),
            Err(e) => {
                debug!("Dropping malformed card under issuer '{}': {}", issuer, e);
                None
            }
        })
        .collect();

    EntryCheck::Valid(CardCatalogEntry {
        card_issuer: issuer.to_string(),
        card,
    })
}

/// Raw entries whose issuer has at least one card name containing `query`
/// (case-insensitive). A matching issuer is kept whole, not just the matching cards.
/// A blank query keeps everything.
pub fn filter_catalog<'a>(catalog: &'a [Value], query: &str) -> Vec<(usize, &'a Value)> {
    if query.trim().is_empty() {
        return catalog.iter().enumerate().collect();
    }
    let needle = query.to_lowercase();

    catalog
        .iter()
        .enumerate()
        .filter(|(_, entry)| {
            entry
                .get("card")
                .and_then(Value::as_array)
                .map(|cards| {
                    cards.iter().any(|card| {
                        card.get("cardName")
                            .and_then(Value::as_str)
                            .is_some_and(|name| name.to_lowercase().contains(&needle))
                    })
                })
                .unwrap_or(false)
        })
        .collect()
}

/// Re-key entries into `issuer -> cards`, merging repeated issuers in first-seen order
pub fn group_by_issuer<'a, I>(entries: I) -> GroupedCatalog
where
    I: IntoIterator<Item = (usize, &'a Value)>,
{
    let mut grouped = GroupedCatalog::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, entry) in entries {
        match check_entry(index, entry) {
            EntryCheck::Valid(group) => match positions.get(&group.card_issuer) {
                Some(&pos) => grouped.sections[pos].card.extend(group.card),
                None => {
                    positions.insert(group.card_issuer.clone(), grouped.sections.len());
                    grouped.sections.push(group);
                }
            },
            EntryCheck::Skipped(skip) => {
                debug!("Skipping catalog entry {}: {:?}", skip.index, skip.reason);
                grouped.skipped.push(skip);
            }
        }
    }

    grouped
}

/// Filter then group; what the add-card view shows for a search term
pub fn search_catalog(catalog: &[Value], query: &str) -> GroupedCatalog {
    group_by_issuer(filter_catalog(catalog, query))
}
