//! API Models
//!
//! Request and response bodies for the gateway, annotated for OpenAPI
//! generation with `utoipa`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Body accepted by `POST /create-web-call`.
#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct CreateWebCallPayload {
    #[schema(example = "agent_99f45564720a36a31d2778cdeb")]
    pub agent_id: Option<String>,
    /// Arbitrary data stored with the call on the vendor side.
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Map<String, Value>>,
    /// Values substituted into the agent's prompt.
    pub retell_llm_dynamic_variables: Option<HashMap<String, String>>,
}

impl CreateWebCallPayload {
    /// Validates the payload and builds the body forwarded to the vendor.
    /// Returns `None` when `agent_id` is missing or blank.
    pub fn into_request(self) -> Option<CreateWebCallRequest> {
        let agent_id = self.agent_id.filter(|id| !id.trim().is_empty())?;
        Some(CreateWebCallRequest {
            agent_id,
            metadata: self.metadata,
            retell_llm_dynamic_variables: self.retell_llm_dynamic_variables,
        })
    }
}

/// Body sent to the vendor's call-creation endpoint. Absent optionals are
/// omitted rather than sent as `null`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateWebCallRequest {
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retell_llm_dynamic_variables: Option<HashMap<String, String>>,
}

/// The parts of the vendor's call-creation response the gateway looks at.
/// The response itself is relayed untouched.
#[derive(Serialize, Deserialize, ToSchema, Debug, Default)]
pub struct WebCallResponse {
    /// Token the browser uses to join the real-time session.
    pub access_token: Option<String>,
    pub call_id: Option<String>,
    pub agent_id: Option<String>,
    pub call_status: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct DomainCheck {
    pub allowed: bool,
    #[schema(example = "http://localhost:3000")]
    pub origin: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_with_only_agent_id_omits_optionals() {
        let payload: CreateWebCallPayload =
            serde_json::from_value(json!({ "agent_id": "agent_1" })).unwrap();
        let request = payload.into_request().unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "agent_id": "agent_1" })
        );
    }

    #[test]
    fn test_null_optionals_are_treated_as_absent() {
        let payload: CreateWebCallPayload = serde_json::from_value(json!({
            "agent_id": "agent_1",
            "metadata": null,
            "retell_llm_dynamic_variables": null
        }))
        .unwrap();

        let value = serde_json::to_value(payload.into_request().unwrap()).unwrap();
        assert_eq!(value, json!({ "agent_id": "agent_1" }));
    }

    #[test]
    fn test_payload_forwards_metadata_and_variables() {
        let payload: CreateWebCallPayload = serde_json::from_value(json!({
            "agent_id": "agent_1",
            "metadata": { "customer": { "tier": 2 } },
            "retell_llm_dynamic_variables": { "name": "Ada" }
        }))
        .unwrap();

        let value = serde_json::to_value(payload.into_request().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "agent_id": "agent_1",
                "metadata": { "customer": { "tier": 2 } },
                "retell_llm_dynamic_variables": { "name": "Ada" }
            })
        );
    }

    #[test]
    fn test_missing_or_blank_agent_id_is_rejected() {
        assert!(CreateWebCallPayload::default().into_request().is_none());

        let blank: CreateWebCallPayload =
            serde_json::from_value(json!({ "agent_id": "  " })).unwrap();
        assert!(blank.into_request().is_none());
    }

    #[test]
    fn test_non_string_dynamic_variable_fails_to_parse() {
        let result: Result<CreateWebCallPayload, _> = serde_json::from_value(json!({
            "agent_id": "agent_1",
            "retell_llm_dynamic_variables": { "count": 3 }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            error: "Failed to create web call".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&error).unwrap(),
            r#"{"error":"Failed to create web call"}"#
        );
    }

    #[test]
    fn test_web_call_response_ignores_unknown_fields() {
        let response: WebCallResponse = serde_json::from_value(json!({
            "access_token": "tok",
            "call_id": "call_1",
            "sample_rate": 24000
        }))
        .unwrap();
        assert_eq!(response.access_token.as_deref(), Some("tok"));
        assert_eq!(response.call_id.as_deref(), Some("call_1"));
        assert_eq!(response.agent_id, None);
    }
}
