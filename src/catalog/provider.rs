use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{error, info};

use super::CatalogSource;

/// Application-scoped catalog cache.
///
/// The first `load` performs the only fetch; every later or concurrent call
/// waits on (or returns) that result. A failed fetch settles the cache as an
/// empty catalog, so consumers never see an error from here.
pub struct CatalogProvider {
    source: Arc<dyn CatalogSource>,
    catalog: OnceCell<Arc<[Value]>>,
}

impl std::fmt::Debug for CatalogProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogProvider")
            .field("loading", &self.is_loading())
            .field("entries", &self.snapshot().len())
            .finish()
    }
}

impl CatalogProvider {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            catalog: OnceCell::new(),
        }
    }

    /// Fetch once and return the cached catalog
    pub async fn load(&self) -> Arc<[Value]> {
        let catalog = self
            .catalog
            .get_or_init(|| async {
                match self.source.fetch_catalog().await {
                    Ok(entries) => {
                        info!("Card catalog loaded with {} issuers", entries.len());
                        Arc::from(entries)
                    }
                    Err(e) => {
                        error!("Error fetching card data: {}", e);
                        Arc::from(Vec::new())
                    }
                }
            })
            .await;
        Arc::clone(catalog)
    }

    /// Start the fetch in the background; consumers call `load` to wait for it
    pub fn spawn_load(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            provider.load().await;
        })
    }

    pub fn is_loading(&self) -> bool {
        !self.catalog.initialized()
    }

    /// Current catalog without waiting; empty while loading
    pub fn snapshot(&self) -> Arc<[Value]> {
        match self.catalog.get() {
            Some(catalog) => Arc::clone(catalog),
            None => Arc::from(Vec::new()),
        }
    }
}
