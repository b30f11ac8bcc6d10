//! Card catalog: a fetch-once cache plus the pure derivations screens build from it.
//!
//! The catalog arrives as raw JSON so that a malformed issuer entry only
//! removes itself from the display instead of failing the whole fetch.

pub mod provider;
pub mod resolve;
pub mod search;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientResult;

pub use provider::CatalogProvider;
pub use resolve::{resolve_feed, CardNameIndex};
pub use search::{
    filter_catalog, group_by_issuer, search_catalog, EntryCheck, GroupedCatalog, SkipReason,
};

/// Where the catalog comes from; the API client in production, fakes in tests
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> ClientResult<Vec<Value>>;
}
