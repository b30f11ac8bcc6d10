use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Web API key of the Firebase project
    pub api_key: String,
    /// Identity Toolkit root (sign-in, sign-up, profile update)
    pub identity_url: Url,
    /// Secure Token root (ID token refresh)
    pub secure_token_url: Url,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Overrides the default `$HOME/.config/smart-credit`
    pub config_dir: Option<PathBuf>,
}

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";

impl ApiConfig {
    /// Absolute URL for an API path such as `/api/credit-cards`
    pub fn endpoint(&self, path: &str) -> String {
        join_path(&self.base_url, path)
    }
}

impl IdentityConfig {
    pub fn identity_endpoint(&self, path: &str) -> String {
        join_path(&self.identity_url, path)
    }

    pub fn secure_token_endpoint(&self, path: &str) -> String {
        join_path(&self.secure_token_url, path)
    }
}

fn join_path(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn parse_url(key: &str, value: &str) -> ClientResult<Url> {
    Url::parse(value).map_err(|e| ClientError::config(format!("{} is not a valid URL: {}", key, e)))
}

impl AppConfig {
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("SMART_CREDIT_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        config.with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("SMART_CREDIT_API_URL") {
            Some(v) => self.api.base_url = parse_url("SMART_CREDIT_API_URL", &v)?,
            None if self.environment == Environment::Production => {
                return Err(ClientError::config("SMART_CREDIT_API_URL must be set in production"));
            }
            None => {}
        }
        if let Some(v) = lookup("SMART_CREDIT_API_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        if let Some(v) = lookup("SMART_CREDIT_FIREBASE_API_KEY") {
            self.identity.api_key = v;
        }
        if let Some(v) = lookup("SMART_CREDIT_IDENTITY_URL") {
            self.identity.identity_url = parse_url("SMART_CREDIT_IDENTITY_URL", &v)?;
        }
        if let Some(v) = lookup("SMART_CREDIT_SECURE_TOKEN_URL") {
            self.identity.secure_token_url = parse_url("SMART_CREDIT_SECURE_TOKEN_URL", &v)?;
        }

        if let Some(v) = lookup("SMART_CREDIT_CONFIG_DIR") {
            self.storage.config_dir = Some(PathBuf::from(v));
        }

        Ok(self)
    }

    fn base(environment: Environment, enable_request_logging: bool) -> Self {
        Self {
            environment,
            api: ApiConfig {
                base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
                enable_request_logging,
            },
            identity: IdentityConfig {
                api_key: String::new(),
                identity_url: Url::parse(DEFAULT_IDENTITY_URL)
                    .expect("default identity URL is valid"),
                secure_token_url: Url::parse(DEFAULT_SECURE_TOKEN_URL)
                    .expect("default secure token URL is valid"),
            },
            storage: StorageConfig { config_dir: None },
        }
    }

    fn development() -> Self {
        Self::base(Environment::Development, true)
    }

    fn staging() -> Self {
        Self::base(Environment::Staging, true)
    }

    fn production() -> Self {
        Self::base(Environment::Production, false)
    }
}
