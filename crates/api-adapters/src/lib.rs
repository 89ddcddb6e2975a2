//! # api-adapters
//!
//! The HTTP surface of ripple: routing, authentication, error mapping and
//! the Prometheus endpoint.

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod auth;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
mod state;

pub use metrics::Metrics;

#[cfg(feature = "web-axum")]
pub use state::AppState;

#[cfg(feature = "web-axum")]
use axum::routing::{get, post};

/// Builds the application router.
///
/// # Developer Note
/// Everything under `/api` requires a bearer session; `/healthz` and
/// `/metrics` stay open for health checks and scrapers.
#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/api/ai/generate-report", post(handlers::generate_report))
        .route(
            "/api/ai/donor-outreach/{donor_id}",
            post(handlers::draft_outreach),
        )
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/donors", get(handlers::list_donors))
        .route("/healthz", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::cors_policy())
        .layer(middleware::trace_layer())
        .with_state(state)
}
