//! Historical lookup endpoint

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use terminal_services::parse_history_date;
use tracing::{error, info};

use super::ErrorResponse;
use crate::AppState;

/// Create history routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/history/{date}", get(get_history))
}

/// Snapshot for one calendar day (`YYYY-MM-DD`)
async fn get_history(Path(date): Path<String>, State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = parse_history_date(&date) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    info!("Historical lookup for {}", date);
    match state.market_data.historical(&date).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            error!("Historical lookup for {} failed: {}", date, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
