pub mod health;

use axum::{http::Uri, routing::get, Router};

use crate::card::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_create_card))
        .route("/layout", get(handlers::handle_layout))
        .route("/image", get(handlers::handle_image))
        .route("/info", get(handlers::handle_info))
        .route("/health", get(health::health_handler))
        .fallback(not_found)
        .with_state(state)
}
