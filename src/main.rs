//! Debug Challenge backend
//!
//! - Axum HTTP + WebSocket API
//! - Optional OpenAI hint assistant (via environment variables)
//! - Static frontend fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   OPENAI_API_KEY     : enables the OpenAI hint assistant if present
//!   OPENAI_BASE_URL    : default "https://api.openai.com/v1"
//!   OPENAI_HINT_MODEL  : default "gpt-4o-mini"
//!   AGENT_CONFIG_PATH  : path to TOML config (prompts, game settings, extra problems)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::info;

use debug_challenge::{build_router, logic, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (problem bank, session store, hint assistant).
  let state = Arc::new(AppState::new()?);

  // Abandoned HTTP sessions are swept once a minute.
  tokio::spawn(logic::run_idle_sweeper(state.clone(), Duration::from_secs(60)));

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "debug_challenge", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "debug_challenge", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "debug_challenge", "Shutdown signal received");
}
