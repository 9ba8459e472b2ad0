//! jobledger gateway
//!
//! - Invocation endpoint: POST /v1/invoke with the job event as JSON
//! - Ops: /healthz, /readyz, /metrics
//! - Config: YAML at $JOBLEDGER_CONFIG (default `jobledger.yaml`)

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use jobledger_core::error::{LedgerError, Result};
use jobledger_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "jobledger-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("JOBLEDGER_CONFIG")
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = AppState::from_config(cfg).await?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "jobledger-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| LedgerError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| LedgerError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    state.set_draining();
    tracing::info!("shutdown requested, draining");
}
