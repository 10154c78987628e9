//! Authenticated HTTP client for the Mallory API.
//!
//! This module owns transport details only: request construction, bearer
//! authentication, timeout, and mapping of HTTP/decoding failures into
//! [`ApiError`]. Payloads are passed through as JSON values untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;

use super::{errors::ApiError, telemetry::ApiCallSpan};
use crate::server::config::ApiSection;

/// Availability endpoint, reachable with or without valid credentials.
pub const HEALTH_ENDPOINT: &str = "/health";
/// Identity endpoint for the account the key authenticates as.
pub const WHOAMI_ENDPOINT: &str = "/users/me";

/// Operations the Mallory API provides to tools.
#[async_trait]
pub trait MalloryApi: Send + Sync {
    /// Check API availability and return the health-status payload.
    async fn health(&self) -> Result<Value, ApiError>;

    /// Return the user account the configured API key belongs to.
    async fn whoami(&self) -> Result<Value, ApiError>;
}

/// reqwest-backed Mallory API client.
pub struct MalloryClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MalloryClient {
    /// Build a client from the validated `[api]` config section and the
    /// resolved API key.
    pub fn new(api: &ApiSection, api_key: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(api.user_agent.clone())
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self {
            client,
            base_url: api.base_url.clone(),
            api_key,
        })
    }

    async fn get_json(&self, endpoint: &'static str) -> Result<Value, ApiError> {
        let span = ApiCallSpan::start(endpoint);
        match self.fetch(endpoint).await {
            Ok((status, payload)) => {
                span.finish("ok", Some(status.as_u16()));
                Ok(payload)
            }
            Err(err) => {
                let http_status = match &err {
                    ApiError::Status { status, .. } => Some(status.as_u16()),
                    _ => None,
                };
                span.finish("error", http_status);
                Err(err)
            }
        }
    }

    async fn fetch(&self, endpoint: &'static str) -> Result<(StatusCode, Value), ApiError> {
        let url = format!("{base}{endpoint}", base = self.base_url);
        let response = self
            .client
            .get(url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {key}", key = self.api_key),
            )
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status,
                message: status_message(status, body.as_ref()),
            });
        }

        let payload =
            serde_json::from_slice(body.as_ref()).map_err(|source| ApiError::Decode {
                endpoint,
                source,
            })?;
        Ok((status, payload))
    }
}

#[async_trait]
impl MalloryApi for MalloryClient {
    async fn health(&self) -> Result<Value, ApiError> {
        self.get_json(HEALTH_ENDPOINT).await
    }

    async fn whoami(&self) -> Result<Value, ApiError> {
        self.get_json(WHOAMI_ENDPOINT).await
    }
}

/// Prefer the API's own error text (`detail` or `message` field) over the
/// canonical status reason.
fn status_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["detail", "message"] {
            if let Some(Value::String(text)) = map.get(key) {
                if !text.trim().is_empty() {
                    return text.clone();
                }
            }
        }
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
