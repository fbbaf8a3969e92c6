//! Gamify · progression backend
//!
//! - Axum HTTP API: quizzes, quest lines and coding challenges that pay out XP
//! - XP/levels/streaks/achievements persisted to one JSON document
//! - Optional LLM content generation (OpenAI-compatible endpoint) with
//!   deterministic fallbacks
//! - Static dashboard fallback (./static/index.html)
//!
//! Important env variables (a `.env` file is honoured):
//!   PORT                : u16 (default 3000)
//!   DATA_DIR            : progress document directory (default "./data")
//!   OPENAI_API_KEY      : enables content generation if present
//!   OPENAI_BASE_URL     : default "https://openrouter.ai/api/v1"
//!   OPENAI_FAST_MODEL   : model used for generation
//!   OPENAI_STRONG_MODEL : model used for solution review
//!   OPENAI_TIMEOUT_SECS : per-request timeout (default 20)
//!   AGENT_CONFIG_PATH   : path to TOML prompt overrides
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod achievements;
mod config;
mod domain;
mod error;
mod featured;
mod logic;
mod openai;
mod progression;
mod protocol;
mod routes;
mod scoring;
mod seeds;
mod sessions;
mod state;
mod store;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Settings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing();

  let settings = Settings::from_env();

  // Session stores, progression engine and optional model client.
  let state = Arc::new(AppState::from_env(&settings.data_dir));

  let app = build_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "gamify", %addr, data_dir = %settings.data_dir.display(), "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  info!(target: "gamify", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "gamify", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "gamify", "Shutdown signal received");
}
