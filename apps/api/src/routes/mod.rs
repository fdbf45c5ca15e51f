pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::report::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Report API
        .route("/api/v1/reports", post(handlers::handle_generate_report))
        .route(
            "/api/v1/reports/:session_id/:report_id/download",
            get(handlers::handle_download_report),
        )
        // Session history
        .route(
            "/api/v1/sessions/:session_id/history",
            get(handlers::handle_get_history).delete(handlers::handle_clear_history),
        )
        .with_state(state)
}
