use axum::{
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::observability::HealthChecker;
use crate::services::LedgerService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LedgerService>,
    pub health: Arc<HealthChecker>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: Arc<LedgerService>) -> Self {
        Self {
            service,
            health: Arc::new(HealthChecker::new()),
            metrics_handle: None,
        }
    }

    /// Adds metrics handle to the state.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Creates the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check))
        .route("/ready", get(handlers::readiness_check))
        // Metrics endpoint
        .route("/metrics", get(handlers::metrics_endpoint))
        // Customer account endpoints
        .route("/customer/:customer_id/credit", post(handlers::post_credit))
        .route("/customer/:customer_id/debit", post(handlers::post_debit))
        .route("/customer/:customer_id/balance", get(handlers::get_balance))
        .route("/customer/:customer_id/history", get(handlers::get_history))
        .route("/customer/:customer_id", delete(handlers::delete_account))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
