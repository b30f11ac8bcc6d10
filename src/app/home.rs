use std::sync::Arc;

use tracing::{debug, error};

use super::AppContext;
use crate::api::ApiClient;
use crate::catalog::{resolve_feed, CardNameIndex, CatalogProvider};
use crate::error::ClientResult;
use crate::types::HomeFeedItem;

/// Bonus feed for the cards the user holds
#[derive(Debug)]
pub struct HomeController {
    api: Arc<ApiClient>,
    catalog: Arc<CatalogProvider>,
    feed: Vec<HomeFeedItem>,
}

impl HomeController {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: Arc::clone(&ctx.api),
            catalog: Arc::clone(&ctx.catalog),
            feed: Vec::new(),
        }
    }

    /// Runs each time the view becomes active. Replaces the held feed on
    /// success; on failure the previous feed stays and the error is returned.
    pub async fn on_activate(&mut self) -> ClientResult<&[HomeFeedItem]> {
        let catalog = self.catalog.load().await;

        let raw = match self.api.home_feed().await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error fetching home feed: {}", e);
                return Err(e);
            }
        };

        let index = CardNameIndex::from_catalog(&catalog);
        self.feed = resolve_feed(&raw, &index);
        debug!("Home feed refreshed with {} cards", self.feed.len());
        Ok(&self.feed)
    }

    pub fn feed(&self) -> &[HomeFeedItem] {
        &self.feed
    }
}
