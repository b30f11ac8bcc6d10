use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{IdentityProvider, IdentityUser};
use crate::config::IdentityConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{KeyValueStore, FIREBASE_USER_KEY};

const SIGN_IN_PATH: &str = "v1/accounts:signInWithPassword";
const SIGN_UP_PATH: &str = "v1/accounts:signUp";
const UPDATE_PATH: &str = "v1/accounts:update";
const TOKEN_PATH: &str = "v1/token";

/// Firebase Authentication over its REST API.
///
/// The signed-in user is persisted in the shared key-value store under
/// `firebase_user`, so a later process picks the session back up.
pub struct FirebaseIdentity {
    http: reqwest::Client,
    config: IdentityConfig,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for FirebaseIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseIdentity")
            .field("identity_url", &self.config.identity_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

// Secure Token replies in snake_case
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

impl AuthResponse {
    fn into_user(self) -> IdentityUser {
        IdentityUser {
            local_id: self.local_id,
            email: self.email,
            display_name: self.display_name.filter(|n| !n.is_empty()),
            photo_url: self.photo_url.filter(|p| !p.is_empty()),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at: expiry_from(&self.expires_in),
        }
    }
}

fn expiry_from(expires_in: &str) -> chrono::DateTime<Utc> {
    // Provider default lifetime is one hour
    let seconds = expires_in.parse::<i64>().unwrap_or(3600);
    Utc::now() + Duration::seconds(seconds)
}

/// Map provider error codes to messages fit for the user
fn friendly_message(code: &str) -> String {
    let (head, detail) = match code.split_once(" : ") {
        Some((head, detail)) => (head, Some(detail)),
        None => (code, None),
    };

    match head {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password.".to_string()
        }
        "EMAIL_EXISTS" => "The email address is already in use by another account.".to_string(),
        "USER_DISABLED" => "This account has been disabled.".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Try again later.".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "INVALID_ID_TOKEN" => {
            "Your sign-in has expired. Please log in again.".to_string()
        }
        _ => detail.unwrap_or(head).to_string(),
    }
}

impl FirebaseIdentity {
    pub fn new(config: IdentityConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            store,
        }
    }

    fn api_key(&self) -> ClientResult<&str> {
        if self.config.api_key.is_empty() {
            return Err(ClientError::config("SMART_CREDIT_FIREBASE_API_KEY is not set"));
        }
        Ok(&self.config.api_key)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let key = self.api_key()?;
        let response = self
            .http
            .post(self.config.identity_endpoint(path))
            .query(&[("key", key)])
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }

    fn persist(&self, user: &IdentityUser) -> ClientResult<()> {
        let encoded = serde_json::to_string(user)?;
        self.store.set(FIREBASE_USER_KEY, &encoded)
    }

    async fn refresh(&self, user: IdentityUser) -> ClientResult<IdentityUser> {
        let key = self.api_key()?;
        debug!("Refreshing identity token for {}", user.email);

        let response = self
            .http
            .post(self.config.secure_token_endpoint(TOKEN_PATH))
            .query(&[("key", key)])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", user.refresh_token.as_str()),
            ])
            .send()
            .await?;
        let refreshed: RefreshResponse = parse_response(response).await?;

        let user = IdentityUser {
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
            expires_at: expiry_from(&refreshed.expires_in),
            ..user
        };
        self.persist(&user)?;
        Ok(user)
    }
}

async fn parse_response<R: DeserializeOwned>(response: reqwest::Response) -> ClientResult<R> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    let code = body
        .pointer("/error/message")
        .and_then(Value::as_str)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"));
    Err(ClientError::identity(friendly_message(code)))
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<IdentityUser> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: AuthResponse = self.post_json(SIGN_IN_PATH, &request).await?;
        let user = response.into_user();
        self.persist(&user)?;
        info!("Signed in {}", user.email);
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> ClientResult<IdentityUser> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: AuthResponse = self.post_json(SIGN_UP_PATH, &request).await?;
        let user = response.into_user();
        self.persist(&user)?;
        info!("Created account {}", user.email);
        Ok(user)
    }

    async fn update_display_name(&self, display_name: &str) -> ClientResult<IdentityUser> {
        let id_token = self.id_token().await?;
        let request = UpdateProfileRequest {
            id_token: &id_token,
            display_name,
            return_secure_token: false,
        };
        let response: UpdateProfileResponse = self.post_json(UPDATE_PATH, &request).await?;

        let mut user = self.current_user()?.ok_or(ClientError::NoCurrentUser)?;
        user.display_name = response
            .display_name
            .filter(|n| !n.is_empty())
            .or_else(|| Some(display_name.to_string()));
        if response.photo_url.is_some() {
            user.photo_url = response.photo_url;
        }
        self.persist(&user)?;
        Ok(user)
    }

    async fn sign_out(&self) -> ClientResult<()> {
        self.store.remove(FIREBASE_USER_KEY)
    }

    fn current_user(&self) -> ClientResult<Option<IdentityUser>> {
        match self.store.get(FIREBASE_USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn id_token(&self) -> ClientResult<String> {
        let user = self.current_user()?.ok_or(ClientError::NoCurrentUser)?;
        if !user.id_token_expired(Utc::now()) {
            return Ok(user.id_token);
        }
        Ok(self.refresh(user).await?.id_token)
    }
}
