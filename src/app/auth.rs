use serde::Serialize;
use tracing::{info, warn};

use super::{AppContext, Route};
use crate::error::{ClientError, ClientResult};
use crate::types::Profile;
use crate::validation::{validate_login, validate_registration};

/// Snapshot of what the local session holds
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    pub signed_in: bool,
    pub email: Option<String>,
    pub has_access_token: bool,
    pub has_refresh_token: bool,
}

/// Login, registration, profile and sign-out against the identity provider and backend
#[derive(Debug)]
pub struct AuthFlow<'a> {
    ctx: &'a AppContext,
}

impl<'a> AuthFlow<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// Verify credentials with the provider, exchange its token, store the app tokens
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Route> {
        validate_login(email, password)?;

        let user = self.ctx.identity.sign_in(email, password).await?;
        self.exchange_and_store(&user.id_token).await?;

        info!("User logged in: {}", user.email);
        Ok(Route::Home)
    }

    /// Create the provider account, name it, then sign in to the backend
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<Route> {
        validate_registration(name, email, password)?;

        let user = self.ctx.identity.sign_up(email, password).await?;
        if let Err(e) = self.ctx.identity.update_display_name(name).await {
            // The account exists either way; the name can be set later
            warn!("Could not set display name for {}: {}", user.email, e);
        }
        self.exchange_and_store(&user.id_token).await?;

        info!("User registered: {}", user.email);
        Ok(Route::AddCard)
    }

    async fn exchange_and_store(&self, id_token: &str) -> ClientResult<()> {
        let tokens = self.ctx.api.exchange_token(id_token).await?;
        self.ctx.session.save_tokens(&tokens)
    }

    /// Current provider user for display; stores a fresh provider token locally
    pub async fn profile(&self) -> ClientResult<Profile> {
        let user = self
            .ctx
            .identity
            .current_user()?
            .ok_or(ClientError::NoCurrentUser)?;

        let token = self.ctx.identity.id_token().await?;
        self.ctx.session.save_firebase_token(&token)?;

        Ok(Profile {
            display_name: user
                .display_name
                .unwrap_or_else(|| "Anonymous".to_string()),
            email: user.email,
            photo_url: user.photo_url,
        })
    }

    pub fn status(&self) -> ClientResult<AuthStatus> {
        let user = self.ctx.identity.current_user()?;
        let tokens = self.ctx.session.tokens()?;

        Ok(AuthStatus {
            signed_in: user.is_some() && tokens.is_some(),
            email: user.map(|u| u.email),
            has_access_token: self.ctx.session.access_token()?.is_some(),
            has_refresh_token: tokens.is_some(),
        })
    }

    /// Leave no session state behind and go back to the start view
    pub async fn sign_out(&self) -> ClientResult<Route> {
        self.ctx.identity.sign_out().await?;
        self.ctx.session.clear()?;
        info!("Signed out");
        Ok(Route::Start)
    }
}
