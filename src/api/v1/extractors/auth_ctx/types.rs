/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が AuthGate で検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - token の検証ロジックは middleware/services 側の責務
 * - 認可 (roles/permissions) はこのサービスの範囲外
 */
use crate::services::auth::Identity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `identity` は identity provider が返したものをそのまま保持する
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
}

impl AuthCtx {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}
