//! Wire types for the QR backend.
//!
//! Everything the backend owns is decoded leniently: optional fields default,
//! unknown fields are ignored, and timestamps accept both RFC 3339 and the
//! naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` form the backend emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of validating a stored session at startup. `tokens` is set when
/// the access token had to be refreshed.
#[derive(Debug, Clone)]
pub struct RestoredSession {
    pub user: User,
    pub tokens: Option<TokenPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrType {
    Static,
    Dynamic,
}

impl QrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrType::Static => "static",
            QrType::Dynamic => "dynamic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "static" | "s" => Some(QrType::Static),
            "dynamic" | "d" => Some(QrType::Dynamic),
            _ => None,
        }
    }
}

impl fmt::Display for QrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    Png,
    Svg,
    Pdf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub id: String,
    pub code: String,
    #[serde(rename = "type")]
    pub qr_type: QrType,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub password_protected: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub expiry_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub design: serde_json::Value,
    #[serde(default)]
    pub download_urls: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QrCode {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unnamed QR Code")
    }

    /// The encoded payload: content for static codes, redirect target for dynamic ones.
    pub fn payload(&self) -> Option<&str> {
        match self.qr_type {
            QrType::Static => self.content.as_deref(),
            QrType::Dynamic => self.target.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateQrRequest {
    #[serde(rename = "type")]
    pub qr_type: QrType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub name: Option<String>,
    pub folder: Option<String>,
    pub formats: Vec<QrFormat>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateQrRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetUpdateRequest {
    pub target: String,
}

/// Server-side list filter for `GET /api/qr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrFilter {
    pub folder: Option<String>,
    pub qr_type: Option<QrType>,
}

impl QrFilter {
    pub fn is_empty(&self) -> bool {
        self.folder.is_none() && self.qr_type.is_none()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref folder) = self.folder {
            pairs.push(("folder", folder.clone()));
        }
        if let Some(qr_type) = self.qr_type {
            pairs.push(("type", qr_type.as_str().to_string()));
        }
        pairs
    }
}

impl fmt::Display for QrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("all");
        }
        let parts: Vec<String> = self
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandingPage {
    pub id: String,
    #[serde(default)]
    pub qr_id: Option<String>,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub collect_leads: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_decode_qr_with_naive_timestamp() {
        let json = r#"{
            "id": "abc",
            "code": "Xy12",
            "type": "dynamic",
            "target": "https://example.com",
            "download_urls": {"png": "/uploads/abc.png"},
            "created_at": "2024-03-05T10:20:30.123456"
        }"#;
        let qr: QrCode = serde_json::from_str(json).unwrap();
        assert_eq!(qr.qr_type, QrType::Dynamic);
        assert_eq!(qr.payload(), Some("https://example.com"));
        assert_eq!(qr.display_name(), "Unnamed QR Code");
        assert_eq!(qr.download_urls.get("png").map(String::as_str), Some("/uploads/abc.png"));
        let created = qr.created_at.unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2024, 3, 5));
        assert_eq!(created.hour(), 10);
    }

    #[test]
    fn test_decode_qr_with_rfc3339_and_nulls() {
        let json = r#"{
            "id": "1", "code": "c", "type": "static", "content": "hello",
            "name": null, "expiry_at": null, "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let qr: QrCode = serde_json::from_str(json).unwrap();
        assert_eq!(qr.payload(), Some("hello"));
        assert!(qr.expiry_at.is_none());
        assert!(qr.created_at.is_some());
    }

    #[test]
    fn test_create_request_omits_unused_payload() {
        let req = CreateQrRequest {
            qr_type: QrType::Static,
            content: Some("hi".into()),
            target: None,
            name: None,
            folder: None,
            formats: vec![QrFormat::Png],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["type"], "static");
        assert_eq!(value["formats"][0], "png");
        assert!(value.get("target").is_none());
    }

    #[test]
    fn test_filter_display_and_query() {
        let filter = QrFilter {
            folder: Some("promo".into()),
            qr_type: Some(QrType::Static),
        };
        assert_eq!(filter.to_string(), "folder=promo type=static");
        assert_eq!(QrFilter::default().to_string(), "all");
        assert_eq!(filter.query_pairs().len(), 2);
    }
}
