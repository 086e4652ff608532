pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

/// Resume files routinely exceed axum's 2 MiB default body limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list).post(handlers::handle_upload),
        )
        .route("/api/v1/resumes/lookup", get(handlers::handle_lookup))
        .route(
            "/api/v1/resumes/:user_id",
            get(handlers::handle_get).put(handlers::handle_replace),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
