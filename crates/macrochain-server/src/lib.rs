//! MacroChain HTTP Server
//!
//! Axum router over the research pipeline. The binary in `main.rs` loads
//! settings, installs logging and serves [`build_router`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod state;

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::handlers::{analyze, health_check, info, not_found, research, root};
pub use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.pipeline.config().timeout_secs);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/info", get(info))
        .route("/analyze", post(analyze))
        .route("/research", post(research))
        .fallback(not_found)
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
