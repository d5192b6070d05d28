//! Client-side checks run before a request leaves the process. Failures are
//! shown on the status line and never reach the store.

use crate::api::models::QrType;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Static QR codes need content")]
    MissingContent,
    #[error("Dynamic QR codes need an http:// or https:// target URL")]
    InvalidTarget,
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

/// Loose check: something, an `@`, then a dotted domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

pub fn validate_target(target: &str) -> Result<(), ValidationError> {
    let url = Url::parse(target.trim()).map_err(|_| ValidationError::InvalidTarget)?;
    let web = matches!(url.scheme(), "http" | "https");
    match url.host_str() {
        Some(host) if web && !host.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidTarget),
    }
}

/// Static codes carry content, dynamic codes carry a redirect target.
pub fn validate_payload(qr_type: QrType, payload: &str) -> Result<(), ValidationError> {
    match qr_type {
        QrType::Static if payload.trim().is_empty() => Err(ValidationError::MissingContent),
        QrType::Static => Ok(()),
        QrType::Dynamic => validate_target(payload),
    }
}
