//! Dashboard state endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use terminal_core::{
    AnalysisResult, ChartSeries, DashboardView, MarketSnapshot, NetworkSnapshot, TimeFrame,
};
use tracing::info;

use crate::AppState;

/// Body for selecting the chart window
#[derive(Debug, Serialize, Deserialize)]
pub struct TimeframeRequest {
    pub timeframe: TimeFrame,
}

/// Create dashboard routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/market", get(get_market))
        .route("/chart", get(get_chart))
        .route("/network", get(get_network))
        .route("/analysis", get(get_analysis))
        .route("/refresh", post(refresh))
        .route("/timeframe", put(set_timeframe))
        .route("/boot/skip", post(skip_boot))
}

/// Full dashboard view at the current version
async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.orchestrator.state().snapshot())
}

async fn get_market(State(state): State<AppState>) -> Json<Option<MarketSnapshot>> {
    Json(state.orchestrator.state().snapshot().market)
}

async fn get_chart(State(state): State<AppState>) -> Json<Option<ChartSeries>> {
    Json(state.orchestrator.state().snapshot().chart)
}

async fn get_network(State(state): State<AppState>) -> Json<Option<NetworkSnapshot>> {
    Json(state.orchestrator.state().snapshot().network)
}

async fn get_analysis(State(state): State<AppState>) -> Json<Option<AnalysisResult>> {
    Json(state.orchestrator.state().snapshot().analysis)
}

/// Kick off a manual refresh; progress shows up in the dashboard flags
async fn refresh(State(state): State<AppState>) -> StatusCode {
    info!("Manual refresh requested");
    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        orchestrator.manual_refresh().await;
    });
    StatusCode::ACCEPTED
}

async fn set_timeframe(
    State(state): State<AppState>,
    Json(request): Json<TimeframeRequest>,
) -> impl IntoResponse {
    state.orchestrator.set_timeframe(request.timeframe);
    Json(TimeframeRequest {
        timeframe: state.orchestrator.state().timeframe(),
    })
}

async fn skip_boot(State(state): State<AppState>) -> StatusCode {
    state.orchestrator.skip_boot();
    StatusCode::ACCEPTED
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use terminal_core::{Phase, TimeFrame};
    use tower::ServiceExt;

    use crate::routes::test_support;

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_before_first_fetch() {
        let app = crate::build_router(test_support::state());

        let response = app
            .oneshot(Request::get("/api/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["phase"], "BOOT");
        assert_eq!(body["timeframe"], "24H");
        assert!(body["market"].is_null());
        assert_eq!(body["version"], 0);
    }

    #[tokio::test]
    async fn test_parts_are_null_not_404() {
        let state = test_support::state();
        for path in ["/api/market", "/api/chart", "/api/network", "/api/analysis"] {
            let response = crate::build_router(state.clone())
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", path);
            assert!(json_body(response).await.is_null(), "{}", path);
        }
    }

    #[tokio::test]
    async fn test_set_timeframe() {
        let state = test_support::state();
        let app = crate::build_router(state.clone());

        let response = app
            .oneshot(
                Request::put("/api/timeframe")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"timeframe":"7D"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["timeframe"], "7D");
        assert_eq!(state.orchestrator.state().timeframe(), TimeFrame::Week);
    }

    #[tokio::test]
    async fn test_set_timeframe_rejects_unknown_window() {
        let app = crate::build_router(test_support::state());

        let response = app
            .oneshot(
                Request::put("/api/timeframe")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"timeframe":"1Y"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_refresh_is_accepted() {
        let state = test_support::state();
        let response = crate::build_router(state.clone())
            .oneshot(Request::post("/api/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        state.orchestrator.shutdown().await;
    }

    #[tokio::test]
    async fn test_skip_boot_outside_boot_is_harmless() {
        let state = test_support::state();
        state.orchestrator.shutdown().await;

        let response = crate::build_router(state.clone())
            .oneshot(Request::post("/api/boot/skip").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(state.orchestrator.state().phase(), Phase::Stopped);
    }
}
