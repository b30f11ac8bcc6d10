// Client Error Types
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, keyed by field name ("email", "password", "name")
pub type FieldErrors = BTreeMap<String, String>;

/// Errors surfaced by the Smart Credit client
#[derive(Debug, Error)]
pub enum ClientError {
    // Transport failures (DNS, connection refused, body decode)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    // Backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Form input rejected before any request was sent
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(FieldErrors),

    #[error("Not logged in. Run `smart-credit auth login` first")]
    NotAuthenticated,

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("No user is currently signed in.")]
    NoCurrentUser,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn identity(message: impl Into<String>) -> Self {
        ClientError::Identity(message.into())
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        ClientError::PermissionDenied(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        ClientError::Config(message.into())
    }

    /// Get error code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Http(_) => "NETWORK_ERROR",
            ClientError::Api { status: 401, .. } => "UNAUTHORIZED",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::Identity(_) => "IDENTITY_ERROR",
            ClientError::NoCurrentUser => "NO_CURRENT_USER",
            ClientError::PermissionDenied(_) => "PERMISSION_DENIED",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Json(_) => "INVALID_JSON",
            ClientError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Field errors when this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Convert to JSON body for `--json` output
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.to_string(),
            "error_code": self.error_code()
        });

        if let Some(field_errors) = self.field_errors() {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}
