//! API routes

use axum::{routing::post, Router};

use crate::AppState;

mod generate;

/// Build the API router with all endpoints
pub fn api_router() -> Router<AppState> {
    Router::new().route("/generate", post(generate::generate))
}
