use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ClientError, ClientResult, FieldErrors};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

pub const MIN_PASSWORD_LEN: usize = 5;

pub fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("Email can't be empty.");
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Some("Ooops! We need a valid email address.");
    }
    None
}

pub fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        return Some("Password can't be empty.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 5 characters long.");
    }
    None
}

pub fn name_error(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("Name can't be empty.");
    }
    None
}

/// Collects per-field messages so every invalid field is reported at once
#[derive(Debug, Default)]
pub struct FormCheck {
    errors: FieldErrors,
}

impl FormCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, error: Option<&str>) -> Self {
        if let Some(msg) = error {
            self.errors.insert(name.to_string(), msg.to_string());
        }
        self
    }

    pub fn finish(self) -> ClientResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation(self.errors))
        }
    }
}

pub fn validate_login(email: &str, password: &str) -> ClientResult<()> {
    FormCheck::new()
        .field("email", email_error(email))
        .field("password", password_error(password))
        .finish()
}

pub fn validate_registration(name: &str, email: &str, password: &str) -> ClientResult<()> {
    FormCheck::new()
        .field("name", name_error(name))
        .field("email", email_error(email))
        .field("password", password_error(password))
        .finish()
}
