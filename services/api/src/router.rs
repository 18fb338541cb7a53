//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the gateway, including
//! the origin guard, CORS, and the OpenAPI documentation.

use crate::{
    handlers,
    models::{CreateWebCallPayload, DomainCheck, ErrorResponse, WebCallResponse},
    origin::require_allowed_origin,
    state::AppState,
};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_web_call,
        handlers::check_domain,
        handlers::health,
    ),
    components(
        schemas(CreateWebCallPayload, WebCallResponse, DomainCheck, ErrorResponse)
    ),
    tags(
        (name = "callbridge", description = "Brokers vendor voice-call sessions for browser widgets")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = app_state.config.allowed_origins.cors_layer();

    // Call creation is only reachable from allow-listed origins.
    let guarded = Router::new()
        .route("/create-web-call", post(handlers::create_web_call))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_allowed_origin,
        ));

    let api_router = Router::new()
        .merge(guarded)
        .route("/check-domain", get(handlers::check_domain))
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
        .layer(cors)
}
