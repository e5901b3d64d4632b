//! HTTP surface for the analysis service.
//!
//! This module provides:
//! - The axum router and handlers (`routes`)
//! - Shared handler state (`state`)
//! - Configuration and secrets loading (`config`)

pub mod config;
pub mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the application router.
///
/// `TimeoutLayer` enforces the endpoint wall-clock ceiling independently
/// of the generation retry policy, whose timeout is validated to sit below
/// it at startup.
pub fn create_router(state: AppState) -> Router {
    let ceiling = state.request_timeout;
    Router::new()
        .route(
            "/analysis",
            get(routes::analysis_info).post(routes::create_analysis),
        )
        .route("/analysis/batch", post(routes::create_batch_analysis))
        .route("/health", get(routes::health_check))
        .layer(TimeoutLayer::new(ceiling))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
