pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::optimize::handlers;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// Upload form that posts both files to `/api/optimize`.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        .route("/api/optimize", post(handlers::handle_optimize))
        // Path the optimize function was originally mounted at
        .route("/optimize", post(handlers::handle_optimize))
        .layer(body_limit)
        .with_state(state)
}
