/*
 * Responsibility
 * - GET /me: 検証済み identity をそのまま返す
 */
use axum::Json;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::services::auth::Identity;

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<Identity> {
    Json(ctx.identity)
}
