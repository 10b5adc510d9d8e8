//! BuildBuddy · Lesson Backend
//!
//! - Axum HTTP + WebSocket API for the coding lessons
//! - Quiz (commented JSON) and story (code snippet) editors kept in step
//!   with their live configs
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   LESSON_CONFIG_PATH : path to TOML content banks (themes, characters, genres)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod transcoder;
mod quiz;
mod story;
mod config;
mod seeds;
mod play;
mod chat;
mod error;
mod session;
mod catalog;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Content banks and an empty session store.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "buildbuddy", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "buildbuddy", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "buildbuddy", error = %e, "Failed to listen for shutdown signal");
  }
}
