//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits (one limit for every route; axum's 2 MB extractor default is off)
//! - Global timeout (time to response head; streamed bodies are not cut off)

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Orchestrator payloads carry whole documents; keep the limit generous.
const BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;

pub fn apply(router: Router, timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(DefaultBodyLimit::disable())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, Bytes},
        http::Request,
        routing::{get, post},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn sets_request_id_on_response() {
        let app = apply(
            Router::new().route("/", get(|| async { "ok" })),
            Duration::from_secs(5),
        );

        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn slow_handler_times_out() {
        let app = apply(
            Router::new().route(
                "/",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            ),
            Duration::from_millis(20),
        );

        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }

    fn body_len_app() -> Router {
        apply(
            Router::new().route("/", post(|body: Bytes| async move { body.len().to_string() })),
            Duration::from_secs(5),
        )
    }

    fn post_bytes(len: usize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-length", len)
            .body(Body::from(vec![b'x'; len]))
            .expect("request")
    }

    #[tokio::test]
    async fn body_above_extractor_default_is_accepted() {
        let len = 3 * 1024 * 1024;

        let res = body_len_app().oneshot(post_bytes(len)).await.expect("response");

        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(body, len.to_string().as_bytes());
    }

    #[tokio::test]
    async fn body_above_limit_is_rejected() {
        let res = body_len_app()
            .oneshot(post_bytes(BODY_LIMIT_BYTES + 1))
            .await
            .expect("response");

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
