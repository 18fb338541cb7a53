//! Client for the Session Gateway's call-registration endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

/// Gateway address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Errors raised while asking the gateway for an access token.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
}

/// The gateway's relay of the vendor's call-creation response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegisterCallResponse {
    pub access_token: Option<String>,
    pub call_id: Option<String>,
    /// Everything else the vendor returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Obtains a per-call access token for an agent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallRegistrar: Send + Sync {
    async fn register_call(&self, agent_id: &str) -> Result<RegisterCallResponse, GatewayError>;
}

/// `CallRegistrar` backed by the gateway's `POST /create-web-call`.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses `API_URL` when set, otherwise [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        let base_url = std::env::var("API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CallRegistrar for GatewayClient {
    async fn register_call(&self, agent_id: &str) -> Result<RegisterCallResponse, GatewayError> {
        let url = format!("{}/create-web-call", self.base_url);
        debug!(%url, agent_id, "Registering web call");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "agent_id": agent_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let message = body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<RegisterCallResponse>().await?)
    }
}
