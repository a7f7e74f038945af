//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use terminal_core::Phase;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    phase: Phase,
    version: u64,
    last_refresh: Option<DateTime<Utc>>,
    has_market: bool,
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let view = state.orchestrator.state().snapshot();

    let (code, status) = match view.phase {
        Phase::Stopped => (StatusCode::SERVICE_UNAVAILABLE, "stopped"),
        _ if view.market.is_some() => (StatusCode::OK, "healthy"),
        _ => (StatusCode::OK, "starting"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        phase: view.phase,
        version: view.version,
        last_refresh: view.last_refresh,
        has_market: view.market.is_some(),
    };

    (code, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::routes::test_support;

    #[tokio::test]
    async fn test_health_while_booting() {
        let app = crate::build_router(test_support::state());
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "starting");
        assert_eq!(body["phase"], "BOOT");
    }

    #[tokio::test]
    async fn test_health_after_shutdown() {
        let state = test_support::state();
        state.orchestrator.shutdown().await;

        let response = crate::build_router(state)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_liveness() {
        let app = crate::build_router(test_support::state());
        let response = app
            .oneshot(Request::get("/api/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
