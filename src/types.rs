use serde::{Deserialize, Serialize};

/// A single card inside an issuer group of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCard {
    pub card_key: String,
    pub card_name: String,
}

/// Issuer-grouped catalog entry as returned by `GET /api/credit-cards`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCatalogEntry {
    pub card_issuer: String,
    pub card: Vec<CatalogCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendBonusCategory {
    #[serde(default)]
    pub spend_bonus_category_name: Option<String>,
    pub spend_bonus_desc: String,
}

/// Home feed entry; `card_name` holds a card key until resolved against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeedItem {
    pub card_name: String,
    #[serde(default)]
    pub spend_bonus_categories: Vec<SpendBonusCategory>,
}

/// App-issued tokens kept in local storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Reply of `POST /playground/login/`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access: String,
    pub refresh: String,
}

impl From<TokenExchangeResponse> for SessionTokens {
    fn from(response: TokenExchangeResponse) -> Self {
        Self {
            access_token: response.access,
            refresh_token: response.refresh,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenExchangeRequest<'a> {
    pub firebase_id_token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddCardRequest<'a> {
    pub company_name: &'a str,
}

/// One-shot device position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// Display data for the profile view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
}
