//! Workflow orchestrator client.
//!
//! Forwards already-authenticated requests to the orchestrator API. The
//! orchestrator's own endpoints (threads, runs, streaming) are opaque here:
//! method, path, query and body pass through unchanged.
//!
//! The timeout bounds connect + response head only. Run streams (SSE) may stay
//! open far longer than any single request should take to start.
//!
//! What changes on the way through:
//! - the caller's `Authorization` header is dropped
//! - `x-api-key` is set when an orchestrator key is configured
//! - `x-auth-user-id` carries the verified user id

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use thiserror::Error;
use url::Url;

use crate::config::OrchestratorConfig;
use crate::services::auth::Identity;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const USER_ID_HEADER: &str = "x-auth-user-id";

/// Request headers copied to the orchestrator. Everything else stays here.
const FORWARDED_HEADERS: [HeaderName; 4] = [
    header::ACCEPT,
    header::CONTENT_TYPE,
    HeaderName::from_static("last-event-id"),
    HeaderName::from_static("x-request-id"),
];

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("invalid orchestrator path")]
    InvalidPath,

    #[error("invalid header value: {0}")]
    InvalidHeader(&'static str),

    #[error("orchestrator did not answer within {0:?}")]
    Timeout(Duration),

    #[error("orchestrator transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One inbound request, reduced to what the orchestrator needs.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    // Raw (still percent-encoded) path below the proxy mount point,
    // e.g. `threads/abc/runs`.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct OrchestratorClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for OrchestratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OrchestratorClient {
    pub fn new(config: &OrchestratorConfig) -> Result<Self, OrchestratorError> {
        // No client-wide timeout: it would also cut off long response bodies.
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the orchestrator URL for a raw sub-path.
    ///
    /// Segments are appended as received, so an encoded `/` (`%2F`) stays
    /// inside its segment. Dot segments, plain or encoded, are refused so a
    /// caller cannot climb out of the orchestrator base path.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Result<Url, OrchestratorError> {
        if self.base_url.cannot_be_a_base() {
            return Err(OrchestratorError::InvalidPath);
        }

        let mut joined = self.base_url.path().trim_end_matches('/').to_string();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if is_dot_segment(segment) {
                return Err(OrchestratorError::InvalidPath);
            }
            joined.push('/');
            joined.push_str(segment);
        }
        if joined.is_empty() {
            joined.push('/');
        }

        let mut url = self.base_url.clone();
        url.set_path(&joined);
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    pub async fn forward(
        &self,
        identity: &Identity,
        req: ForwardRequest,
    ) -> Result<reqwest::Response, OrchestratorError> {
        let url = self.target_url(&req.path, req.query.as_deref())?;

        let mut headers = HeaderMap::new();
        for name in FORWARDED_HEADERS.iter() {
            for value in req.headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        if let Some(key) = &self.api_key {
            headers.insert(
                HeaderName::from_static(API_KEY_HEADER),
                HeaderValue::from_str(key)
                    .map_err(|_| OrchestratorError::InvalidHeader(API_KEY_HEADER))?,
            );
        }
        headers.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&identity.user_id)
                .map_err(|_| OrchestratorError::InvalidHeader(USER_ID_HEADER))?,
        );

        tracing::debug!(
            method = %req.method,
            url = %url,
            user_id = %identity.user_id,
            "forwarding to orchestrator"
        );

        let send = self
            .http
            .request(req.method, url)
            .headers(headers)
            .body(req.body)
            .send();

        let res = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| OrchestratorError::Timeout(self.timeout))??;

        Ok(res)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e."
    )
}
