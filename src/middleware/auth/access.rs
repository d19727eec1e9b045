//! Bearer token 検証 → Identity (AuthCtx) を extensions に入れる
//!
//! - `Authorization: Bearer <token>` を AuthGate で検証する
//! - 失敗時は原因 (missing / malformed / provider rejected) に関わらず 401
//! - 成功時のみ handler まで到達する (未検証の identity で下流が動くことはない)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 保護したい Router に認証 middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: マッチしたルートにだけ掛ける (未定義パスは 401 ではなく 404)
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state.auth.authenticate(req.headers()).await?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(identity));

    Ok(next.run(req).await)
}
