use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/activity-summary", get(handlers::get_activity_summary))
        .route("/ranges", get(handlers::get_ranges))
        .with_state(state)
}
