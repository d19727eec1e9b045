/*
 * Responsibility
 * - /orchestrator/{*path}: 認証済みリクエストを workflow orchestrator へ転送する
 * - upstream の status / body (stream) をそのまま返す
 *
 * Notes
 * - path は Path extractor ではなく URI から取る (%2F を decode させないため)
 */
use axum::{
    body::{Body, Bytes},
    extract::{RawQuery, State},
    http::{HeaderMap, HeaderName, Method, Uri, header},
    response::Response,
};

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::services::orchestrator::ForwardRequest;
use crate::state::AppState;

/// Mount point of the proxy inside the v1 router.
pub const MOUNT: &str = "/orchestrator";

// Upstream response headers relayed to the caller.
const RELAYED_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CACHE_CONTROL,
    header::CONTENT_LOCATION,
    header::LOCATION,
];

pub async fn forward(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    uri: Uri,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // Inside the nested v1 router `Uri` is relative to `/api/v1`.
    let path = uri
        .path()
        .strip_prefix(MOUNT)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| AppError::bad_request("INVALID_PATH", "invalid orchestrator path"))?
        .to_string();

    let upstream = state
        .orchestrator
        .forward(
            &ctx.identity,
            ForwardRequest {
                method,
                path,
                query,
                headers,
                body,
            },
        )
        .await?;

    let mut builder = Response::builder().status(upstream.status());
    for name in RELAYED_HEADERS.iter() {
        if let Some(value) = upstream.headers().get(name) {
            builder = builder.header(name.clone(), value.clone());
        }
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|err| {
            tracing::error!(error = %err, "failed to build proxied response");
            AppError::Internal
        })
}
