//! API route definitions

mod dashboard;
mod health;
mod history;
pub mod ws;

use axum::Router;
use serde::Serialize;

use crate::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard::routes())
        .merge(history::routes())
        .merge(health::routes())
}

/// Create WebSocket routes (separate from API)
pub fn ws_routes() -> Router<AppState> {
    ws::routes()
}
