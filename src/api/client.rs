//! HTTP client for the QR backend.

use crate::api::error::ApiError;
use crate::api::models::*;
use crate::config::ApiConfig;
use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Thin typed wrapper over `reqwest::Client`. Cloning is cheap: the inner
/// client is reference-counted, so every spawned request gets its own handle.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.client.post(self.url("/api/auth/login")).json(credentials);
        fetch_json(request).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let request = self.client.post(self.url("/api/auth/signup")).json(request);
        fetch_json(request).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .client
            .post(self.url("/api/auth/refresh"))
            .json(&RefreshRequest { refresh_token });
        fetch_json(request).await
    }

    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        let request = self.client.get(self.url("/api/auth/me")).bearer_auth(token);
        fetch_json(request).await
    }

    /// Validate a stored access token. When the backend rejects it as expired
    /// and a refresh token is available, trade the refresh token for a new pair.
    pub async fn restore_session(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<RestoredSession, ApiError> {
        match self.me(access_token).await {
            Ok(user) => Ok(RestoredSession { user, tokens: None }),
            Err(e) if e.is_unauthorized() => {
                let Some(refresh_token) = refresh_token else {
                    return Err(e);
                };
                let auth = self.refresh(refresh_token).await?;
                Ok(RestoredSession {
                    user: auth.user,
                    tokens: Some(TokenPair {
                        access_token: auth.access_token,
                        refresh_token: auth.refresh_token,
                    }),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_qr_codes(&self, token: &str, filter: &QrFilter) -> Result<Vec<QrCode>, ApiError> {
        let request = self
            .client
            .get(self.url("/api/qr"))
            .bearer_auth(token)
            .query(&filter.query_pairs());
        fetch_json(request).await
    }

    pub async fn create_qr_code(&self, token: &str, body: &CreateQrRequest) -> Result<QrCode, ApiError> {
        let request = self.client.post(self.url("/api/qr")).bearer_auth(token).json(body);
        fetch_json(request).await
    }

    pub async fn update_qr_code(
        &self,
        token: &str,
        id: &str,
        body: &UpdateQrRequest,
    ) -> Result<QrCode, ApiError> {
        let request = self
            .client
            .patch(self.url(&format!("/api/qr/{}", id)))
            .bearer_auth(token)
            .json(body);
        fetch_json(request).await
    }

    pub async fn update_qr_target(
        &self,
        token: &str,
        id: &str,
        body: &TargetUpdateRequest,
    ) -> Result<QrCode, ApiError> {
        let request = self
            .client
            .put(self.url(&format!("/api/qr/{}/target", id)))
            .bearer_auth(token)
            .json(body);
        fetch_json(request).await
    }

    pub async fn delete_qr_code(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/qr/{}", id)))
            .bearer_auth(token);
        send(request).await.map(|_| ())
    }

    pub async fn dashboard_analytics(&self, token: &str) -> Result<serde_json::Value, ApiError> {
        let request = self
            .client
            .get(self.url("/api/analytics/dashboard"))
            .bearer_auth(token);
        fetch_json(request).await
    }

    pub async fn qr_analytics(&self, token: &str, id: &str) -> Result<serde_json::Value, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/api/analytics/qr/{}/summary", id)))
            .bearer_auth(token);
        fetch_json(request).await
    }

    pub async fn list_landing_pages(&self, token: &str) -> Result<Vec<LandingPage>, ApiError> {
        let request = self
            .client
            .get(self.url("/api/landing-pages"))
            .bearer_auth(token);
        fetch_json(request).await
    }

    pub async fn delete_landing_page(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("/api/landing-pages/{}", id)))
            .bearer_auth(token);
        send(request).await.map(|_| ())
    }
}

/// Send a request and turn non-2xx responses into [`ApiError::Status`].
async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_status(status.as_u16(), &body))
}

async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = send(request).await?;
    Ok(response.json::<T>().await?)
}
