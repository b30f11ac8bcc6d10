pub mod store;

use std::sync::Arc;

use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::types::SessionTokens;
pub use store::{FileStore, KeyValueStore, MemoryStore};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const FIREBASE_TOKEN_KEY: &str = "firebase_access_token";
pub const FIREBASE_USER_KEY: &str = "firebase_user";

/// Every key a signed-in session may leave behind
pub const SESSION_KEYS: [&str; 4] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    FIREBASE_TOKEN_KEY,
    FIREBASE_USER_KEY,
];

/// Typed access to the app's session entries in local storage
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Underlying store, shared with the identity provider's persistence
    pub fn backing_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub fn save_tokens(&self, tokens: &SessionTokens) -> ClientResult<()> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        debug!("Stored app session tokens");
        Ok(())
    }

    pub fn tokens(&self) -> ClientResult<Option<SessionTokens>> {
        let access = self.store.get(ACCESS_TOKEN_KEY)?;
        let refresh = self.store.get(REFRESH_TOKEN_KEY)?;
        Ok(match (access, refresh) {
            (Some(access_token), Some(refresh_token)) => Some(SessionTokens {
                access_token,
                refresh_token,
            }),
            _ => None,
        })
    }

    pub fn access_token(&self) -> ClientResult<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    /// Access token for a bearer-authenticated call
    pub fn require_access_token(&self) -> ClientResult<String> {
        self.access_token()?.ok_or(ClientError::NotAuthenticated)
    }

    pub fn save_firebase_token(&self, token: &str) -> ClientResult<()> {
        self.store.set(FIREBASE_TOKEN_KEY, token)
    }

    pub fn firebase_token(&self) -> ClientResult<Option<String>> {
        self.store.get(FIREBASE_TOKEN_KEY)
    }

    /// Remove every session entry; idempotent
    pub fn clear(&self) -> ClientResult<()> {
        for key in SESSION_KEYS {
            self.store.remove(key)?;
        }
        debug!("Cleared local session");
        Ok(())
    }

    /// True when any session entry is still present
    pub fn has_residual_state(&self) -> ClientResult<bool> {
        for key in SESSION_KEYS {
            if self.store.get(key)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
