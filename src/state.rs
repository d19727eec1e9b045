/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: AuthGate (identity provider を内包), orchestrator: OrchestratorClient
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::AuthGate, orchestrator::OrchestratorClient};

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthGate>,
    pub orchestrator: Arc<OrchestratorClient>,
}

impl AppState {
    pub fn new(auth: Arc<AuthGate>, orchestrator: Arc<OrchestratorClient>) -> Self {
        Self { auth, orchestrator }
    }
}
