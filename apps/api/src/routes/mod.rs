pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::quiz::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/loading-facts", get(handlers::handle_loading_facts))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route("/api/v1/sessions/:id/start", post(handlers::handle_start))
        .route(
            "/api/v1/sessions/:id/profile",
            post(handlers::handle_submit_profile),
        )
        .route("/api/v1/sessions/:id/answers", post(handlers::handle_answer))
        .route("/api/v1/sessions/:id/restart", post(handlers::handle_restart))
        // Presenting
        .route(
            "/api/v1/sessions/:id/slides/next",
            post(handlers::handle_next_slide),
        )
        .route(
            "/api/v1/sessions/:id/slides/prev",
            post(handlers::handle_prev_slide),
        )
        .route(
            "/api/v1/sessions/:id/report",
            get(handlers::handle_download_report),
        )
        .with_state(state)
}
