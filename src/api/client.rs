use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::*;
use crate::catalog::CatalogSource;
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::types::{
    AddCardRequest, Coordinates, SessionTokens, TokenExchangeRequest, TokenExchangeResponse,
};

/// HTTP client for the Smart Credit backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: SessionStore) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(TUNNEL_HEADER, HeaderValue::from_static(TUNNEL_HEADER_VALUE));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Raw issuer-grouped catalog; entries are validated by the consumer
    pub async fn fetch_catalog(&self) -> ClientResult<Vec<Value>> {
        let request = self.http.get(self.config.endpoint(CATALOG_PATH));
        let response = self.send(request, CATALOG_PATH).await?;
        Ok(response.json().await?)
    }

    /// Trade an identity provider ID token for app-issued access/refresh tokens
    pub async fn exchange_token(&self, firebase_id_token: &str) -> ClientResult<SessionTokens> {
        let request = self
            .http
            .post(self.config.endpoint(TOKEN_EXCHANGE_PATH))
            .json(&TokenExchangeRequest { firebase_id_token });
        let response = self.send(request, TOKEN_EXCHANGE_PATH).await?;
        let body: TokenExchangeResponse = response.json().await?;
        Ok(body.into())
    }

    pub async fn add_card(&self, card_key: &str) -> ClientResult<Value> {
        let request = self
            .authorized(self.http.post(self.config.endpoint(ADD_CARD_PATH)))?
            .json(&AddCardRequest {
                company_name: card_key,
            });
        let response = self.send(request, ADD_CARD_PATH).await?;
        json_or_null(response).await
    }

    /// Unresolved home feed items as the backend returned them
    pub async fn home_feed(&self) -> ClientResult<Vec<Value>> {
        let request = self.authorized(self.http.get(self.config.endpoint(HOME_FEED_PATH)))?;
        let response = self.send(request, HOME_FEED_PATH).await?;
        Ok(response.json().await?)
    }

    pub async fn nearby_offers(&self, position: &Coordinates) -> ClientResult<Value> {
        let request = self
            .authorized(self.http.post(self.config.endpoint(NEARBY_PATH)))?
            .json(position);
        let response = self.send(request, NEARBY_PATH).await?;
        json_or_null(response).await
    }

    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.session.require_access_token()?;
        Ok(request.bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if self.config.enable_request_logging {
            debug!("{} -> {}", path, status);
        }

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::api(status.as_u16(), error_message(&body, status)))
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_catalog(&self) -> ClientResult<Vec<Value>> {
        ApiClient::fetch_catalog(self).await
    }
}

async fn json_or_null(response: Response) -> ClientResult<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Pull a readable message out of an error body (`detail`, `message` or `error`)
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["detail", "message", "error"] {
            if let Some(msg) = value.get(field).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
