/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (AuthGate, OrchestratorClient) → Router 組み立て
 * - Middleware の適用 (HTTP / CORS / security headers / bearer)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{auth::build_auth_gate, orchestrator::OrchestratorClient};
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,workflow_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast / production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let auth = build_auth_gate(config).context("failed to build identity provider")?;

    let orchestrator = OrchestratorClient::new(&config.orchestrator)
        .context("failed to build orchestrator client")?;
    tracing::info!(url = %orchestrator.base_url(), "orchestrator configured");

    Ok(AppState::new(auth, Arc::new(orchestrator)))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    // Request timeout covers the orchestrator round trip to response head.
    let router = middleware::http::apply(router, config.orchestrator.timeout);
    let router = middleware::cors::apply(router, config);
    middleware::security_headers::apply(router)
}
