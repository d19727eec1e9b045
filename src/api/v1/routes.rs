/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/me と /orchestrator/{*path} は bearer 認証必須
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::api::v1::handlers::{
    health::health,
    me::me,
    orchestrator::{MOUNT, forward},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new()
        .route("/me", get(me))
        .route(&format!("{MOUNT}/{{*path}}"), any(forward));
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
