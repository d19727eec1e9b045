/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - auth / orchestrator の error を統一的に変換
 *
 * Notes
 * - 401 の body は原因に関わらず同一 (missing / malformed / provider rejected を区別しない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::RejectReason;
use crate::services::orchestrator::OrchestratorError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad gateway")]
    BadGateway,
    #[error("gateway timeout")]
    GatewayTimeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::BadGateway => (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "upstream request failed".into(),
            ),
            AppError::GatewayTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "GATEWAY_TIMEOUT",
                "upstream did not respond in time".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RejectReason> for AppError {
    fn from(_: RejectReason) -> Self {
        // Cause is logged by the gate; never echoed to the client
        AppError::Unauthorized
    }
}

impl From<OrchestratorError> for AppError {
    fn from(e: OrchestratorError) -> Self {
        match e {
            OrchestratorError::InvalidPath => {
                AppError::bad_request("INVALID_PATH", "invalid orchestrator path")
            }
            OrchestratorError::Timeout(_) => {
                tracing::warn!(error = %e, "orchestrator request timed out");
                AppError::GatewayTimeout
            }
            OrchestratorError::InvalidHeader(_) | OrchestratorError::Transport(_) => {
                tracing::error!(error = %e, "orchestrator request failed");
                AppError::BadGateway
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn every_reject_reason_renders_the_same_401() {
        let mut bodies = Vec::new();
        for reason in [
            RejectReason::MissingCredential,
            RejectReason::MalformedCredential,
            RejectReason::ProviderRejected,
        ] {
            let (status, body) = render(AppError::from(reason)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            bodies.push(body);
        }

        assert!(bodies.iter().all(|b| b == &json!({
            "error": {"code": "UNAUTHORIZED", "message": "unauthorized"}
        })));
    }

    #[tokio::test]
    async fn orchestrator_transport_is_bad_gateway() {
        let (status, body) = render(AppError::from(OrchestratorError::InvalidHeader(
            "x-auth-user-id",
        )))
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "BAD_GATEWAY");
    }

    #[tokio::test]
    async fn invalid_path_is_bad_request() {
        let (status, body) = render(AppError::from(OrchestratorError::InvalidPath)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PATH");
    }

    #[tokio::test]
    async fn orchestrator_timeout_is_gateway_timeout() {
        let (status, body) = render(AppError::from(OrchestratorError::Timeout(
            std::time::Duration::from_secs(1),
        )))
        .await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"]["code"], "GATEWAY_TIMEOUT");
    }
}
