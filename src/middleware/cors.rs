//! CORS policy for the browser front-end.
//!
//! Policy:
//! - Development: any origin, WITHOUT credentials.
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`, WITHOUT credentials.
//!   An empty allowlist sends no CORS headers at all.
//!
//! Credentials are never needed: the front-end authenticates with an explicit
//! bearer header, not cookies.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

pub fn layer(config: &Config) -> CorsLayer {
    let base = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    base.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("last-event-id"),
        HeaderName::from_static("x-request-id"),
    ])
    .expose_headers([HeaderName::from_static("x-request-id")])
    .max_age(Duration::from_secs(60 * 10))
}

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn config(env: &str, origins: &str) -> Config {
        Config::from_lookup(|key| match key {
            "APP_ENV" => Some(env.to_string()),
            "CORS_ALLOWED_ORIGINS" => Some(origins.to_string()),
            "IDENTITY_PROVIDER" => Some("jwt".to_string()),
            "SUPABASE_JWT_SECRET" => Some("secret".to_string()),
            _ => None,
        })
        .expect("config")
    }

    async fn allow_origin_for(config: &Config, origin: &str) -> Option<String> {
        let app = apply(Router::new().route("/", get(|| async { "ok" })), config);
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn development_allows_any_origin() {
        let config = config("development", "");
        assert_eq!(
            allow_origin_for(&config, "http://localhost:3000").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn production_uses_allowlist() {
        let config = config("production", "https://app.example");
        assert_eq!(
            allow_origin_for(&config, "https://app.example").await.as_deref(),
            Some("https://app.example")
        );
        assert_eq!(allow_origin_for(&config, "https://evil.example").await, None);
    }
}
