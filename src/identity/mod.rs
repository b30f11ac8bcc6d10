pub mod firebase;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
pub use firebase::FirebaseIdentity;

/// Signed-in account as held by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    pub local_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl IdentityUser {
    /// Treat tokens within a minute of expiry as already expired
    pub fn id_token_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(60) >= self.expires_at
    }
}

/// External email/password identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug {
    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<IdentityUser>;

    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<IdentityUser>;

    /// Set the display name on the signed-in account
    async fn update_display_name(&self, display_name: &str) -> ClientResult<IdentityUser>;

    async fn sign_out(&self) -> ClientResult<()>;

    fn current_user(&self) -> ClientResult<Option<IdentityUser>>;

    /// ID token of the current user, renewed with the provider when expired
    async fn id_token(&self) -> ClientResult<String>;
}
