use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::AppContext;
use crate::api::ApiClient;
use crate::catalog::{search_catalog, CardNameIndex, CatalogProvider, GroupedCatalog};
use crate::error::{ClientError, ClientResult, FieldErrors};

/// Catalog browser with search; adds a chosen card to the user's wallet
#[derive(Debug)]
pub struct AddCardController {
    api: Arc<ApiClient>,
    catalog: Arc<CatalogProvider>,
    search_term: String,
}

impl AddCardController {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: Arc::clone(&ctx.api),
            catalog: Arc::clone(&ctx.catalog),
            search_term: String::new(),
        }
    }

    /// Wait for the shared catalog; returns immediately once it has settled
    pub async fn activate(&self) {
        self.catalog.load().await;
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_loading()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Issuer sections matching the current search term
    pub fn sections(&self) -> GroupedCatalog {
        search_catalog(&self.catalog.snapshot(), &self.search_term)
    }

    /// Submit one card; nothing is held between submissions
    pub async fn add_card(&self, card_key: &str) -> ClientResult<Value> {
        let card_key = card_key.trim();
        if card_key.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("card".to_string(), "Card can't be empty.".to_string());
            return Err(ClientError::Validation(errors));
        }

        let index = CardNameIndex::from_catalog(&self.catalog.snapshot());
        if !index.is_empty() && index.resolve(card_key) == card_key {
            warn!("Card '{}' is not in the catalog; submitting anyway", card_key);
        }

        let result = self.api.add_card(card_key).await;

        if result.is_ok() {
            info!("Added {}", index.resolve(card_key));
        }
        result
    }
}
