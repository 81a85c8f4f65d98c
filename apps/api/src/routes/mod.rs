pub mod health;
pub mod sheet;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/upload", post(sheet::handle_upload))
        .route("/api/preview", post(sheet::handle_preview))
        .route("/api/preview/html", post(sheet::handle_preview_html))
        .route("/api/export-json", post(sheet::handle_export_json))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
