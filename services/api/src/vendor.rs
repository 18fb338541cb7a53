//! Client for the vendor's call-creation REST endpoint.

use crate::models::CreateWebCallRequest;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;

/// Errors from the vendor call. None of these are shown to browsers.
#[derive(Debug, thiserror::Error)]
pub enum VendorError {
    #[error("Vendor request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Vendor responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Vendor returned a body that is not JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// Creates vendor web calls on behalf of browsers.
#[async_trait]
pub trait VendorApi: Send + Sync {
    /// Creates one web call and returns the vendor's JSON body as received.
    async fn create_web_call(&self, request: &CreateWebCallRequest) -> Result<Bytes, VendorError>;
}

/// `VendorApi` for Retell's `POST /v2/create-web-call`.
pub struct RetellClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl RetellClient {
    pub fn new(
        api_base: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, VendorError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/v2/create-web-call", api_base.trim_end_matches('/')),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VendorApi for RetellClient {
    async fn create_web_call(&self, request: &CreateWebCallRequest) -> Result<Bytes, VendorError> {
        debug!(endpoint = %self.endpoint, agent_id = %request.agent_id, "Creating vendor web call");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(VendorError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice::<serde_json::Value>(&body)?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_without_double_slash() {
        let client = RetellClient::new(
            "https://api.retellai.com/",
            SecretString::from("key".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.retellai.com/v2/create-web-call"
        );
    }

    #[test]
    fn test_status_error_display_includes_vendor_body() {
        let err = VendorError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid api key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Vendor responded with 401 Unauthorized: invalid api key"
        );
    }
}
