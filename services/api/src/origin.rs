//! Origin Allow-List
//!
//! Browsers may only call the gateway from allow-listed origins. The list
//! drives three things: the CORS response headers, the guard in front of
//! `/create-web-call`, and the `/check-domain` diagnostic.

use crate::{handlers::ApiError, state::AppState};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use reqwest::Url;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Comma-separated domains that may call the gateway. An origin matches when
/// it contains any entry, so `localhost:3000` admits `http://localhost:3000`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowedOrigins {
    domains: Vec<String>,
}

impl AllowedOrigins {
    pub fn parse(csv: &str) -> Self {
        let mut origins = Self::default();
        for domain in csv.split(',') {
            origins.push(domain);
        }
        origins
    }

    /// Adds one entry. Blank entries are ignored.
    pub fn push(&mut self, domain: &str) {
        let domain = domain.trim();
        if !domain.is_empty() {
            self.domains.push(domain.to_string());
        }
    }

    /// Adds a frontend URL, reduced to the `scheme://host[:port]` a browser
    /// sends as `Origin`. Values that are not absolute URLs only lose trailing
    /// slashes.
    pub fn push_url(&mut self, url: &str) {
        let url = url.trim();
        match Url::parse(url) {
            Ok(parsed) if parsed.origin().is_tuple() => {
                self.push(&parsed.origin().ascii_serialization())
            }
            _ => self.push(url.trim_end_matches('/')),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Requests without an `Origin` (curl, server-to-server) are allowed.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.domains.iter().any(|domain| origin.contains(domain.as_str())),
        }
    }

    /// Like [`is_allowed`](Self::is_allowed), but an `Origin` header that is
    /// present and unreadable is never admitted.
    pub fn admits(&self, origin: &RequestOrigin<'_>) -> bool {
        match origin {
            RequestOrigin::Absent => true,
            RequestOrigin::Present(origin) => self.is_allowed(Some(origin)),
            RequestOrigin::Unreadable(_) => false,
        }
    }

    /// CORS layer mirroring allow-listed origins, with credentials.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins = self.clone();
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts| {
                    origin
                        .to_str()
                        .map(|origin| origins.is_allowed(Some(origin)))
                        .unwrap_or(false)
                },
            ))
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

/// The request's `Origin` header as the allow-list sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin<'a> {
    Absent,
    Present(&'a str),
    /// Sent, but not visible ASCII.
    Unreadable(&'a HeaderValue),
}

impl<'a> RequestOrigin<'a> {
    pub fn from_headers(headers: &'a HeaderMap) -> Self {
        match headers.get(header::ORIGIN) {
            None => RequestOrigin::Absent,
            Some(value) => match value.to_str() {
                Ok(origin) => RequestOrigin::Present(origin),
                Err(_) => RequestOrigin::Unreadable(value),
            },
        }
    }

    /// Text echoed back by the domain check.
    pub fn describe(&self) -> String {
        match self {
            RequestOrigin::Absent => "No origin provided".to_string(),
            RequestOrigin::Present(origin) => origin.to_string(),
            RequestOrigin::Unreadable(value) => {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            }
        }
    }
}

/// Middleware that rejects requests from origins outside the allow-list.
pub async fn require_allowed_origin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let origin = RequestOrigin::from_headers(request.headers());
    if !state.config.allowed_origins.admits(&origin) {
        warn!(origin = ?origin, path = %request.uri().path(), "Rejected request from disallowed origin");
        return Err(ApiError::Forbidden("Not allowed by CORS".to_string()));
    }
    Ok(next.run(request).await)
}
