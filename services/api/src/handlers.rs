//! Axum Handlers for the REST API
//!
//! The gateway's endpoints: call creation, the origin diagnostic, and the
//! liveness checks. Handlers carry `utoipa` annotations for the OpenAPI document.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    models::{CreateWebCallPayload, DomainCheck, ErrorResponse, WebCallResponse},
    origin::RequestOrigin,
    state::AppState,
    vendor::VendorError,
};

pub const CREATE_WEB_CALL_FAILED: &str = "Failed to create web call";
pub const HEALTHY: &str = "Server is healthy";

pub enum ApiError {
    BadRequest(String),
    Forbidden(String),
    /// The vendor call failed. Details are logged, never returned.
    Upstream(VendorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Forbidden(error) => {
                (StatusCode::FORBIDDEN, Json(ErrorResponse { error })).into_response()
            }
            ApiError::Upstream(err) => {
                error!(error = %err, "Error creating web call");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: CREATE_WEB_CALL_FAILED.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<VendorError> for ApiError {
    fn from(err: VendorError) -> Self {
        Self::Upstream(err)
    }
}

/// Create a vendor web call and return its access token.
#[utoipa::path(
    post,
    path = "/create-web-call",
    request_body = CreateWebCallPayload,
    responses(
        (status = 201, description = "Vendor response, relayed verbatim", body = WebCallResponse),
        (status = 400, description = "Malformed body or missing agent_id", body = ErrorResponse),
        (status = 403, description = "Origin not allowed", body = ErrorResponse),
        (status = 500, description = "Vendor call failed", body = ErrorResponse)
    )
)]
pub async fn create_web_call(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateWebCallPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected create-web-call body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let request = payload
        .into_request()
        .ok_or_else(|| ApiError::BadRequest("agent_id is required".to_string()))?;

    let body = state.vendor.create_web_call(&request).await?;

    let summary: WebCallResponse = serde_json::from_slice(&body).unwrap_or_default();
    info!(
        agent_id = %request.agent_id,
        call_id = ?summary.call_id,
        "Web call created"
    );

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// Report whether the request's origin is on the allow-list.
#[utoipa::path(
    get,
    path = "/check-domain",
    responses(
        (status = 200, description = "Origin check result", body = DomainCheck)
    ),
    params(
        ("origin" = Option<String>, Header, description = "The calling page's origin")
    )
)]
pub async fn check_domain(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<DomainCheck> {
    let origin = RequestOrigin::from_headers(&headers);
    Json(DomainCheck {
        allowed: state.config.allowed_origins.admits(&origin),
        origin: origin.describe(),
    })
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = String, content_type = "text/plain")
    )
)]
pub async fn health() -> &'static str {
    HEALTHY
}
