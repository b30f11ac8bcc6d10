//! Application wiring and the per-view controllers built on it.

pub mod add_card;
pub mod auth;
pub mod home;
pub mod nearby;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::api::ApiClient;
use crate::catalog::CatalogProvider;
use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::identity::{FirebaseIdentity, IdentityProvider};
use crate::session::{KeyValueStore, SessionStore};

pub use add_card::AddCardController;
pub use auth::AuthFlow;
pub use home::HomeController;

/// Where the app goes after a flow completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Start,
    Login,
    Register,
    Home,
    AddCard,
    Profile,
}

/// Everything a view needs, built once at startup and shared by reference
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub session: SessionStore,
    pub api: Arc<ApiClient>,
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: Arc<CatalogProvider>,
}

impl AppContext {
    /// Wire the API client, Firebase identity and catalog cache over one store
    pub fn new(config: AppConfig, store: Arc<dyn KeyValueStore>) -> ClientResult<Self> {
        let identity = Arc::new(FirebaseIdentity::new(config.identity.clone(), Arc::clone(&store)));
        Self::with_identity(config, store, identity)
    }

    pub fn with_identity(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> ClientResult<Self> {
        let session = SessionStore::new(store);
        let api = Arc::new(ApiClient::new(config.api.clone(), session.clone())?);
        let catalog = Arc::new(CatalogProvider::new(api.clone()));

        Ok(Self {
            config,
            session,
            api,
            identity,
            catalog,
        })
    }

    /// Kick off the eager catalog fetch
    pub fn start(&self) {
        debug!("Starting catalog load");
        self.catalog.spawn_load();
    }

    pub fn auth(&self) -> AuthFlow<'_> {
        AuthFlow::new(self)
    }

    pub fn home(&self) -> HomeController {
        HomeController::new(self)
    }

    pub fn add_card(&self) -> AddCardController {
        AddCardController::new(self)
    }
}
