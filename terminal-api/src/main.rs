//! Orange Reactor API Server
//!
//! Serves the live bitcoin dashboard state over HTTP and WebSocket while
//! the polling orchestrator keeps it fresh in the background.

mod config;
mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use terminal_analyst::{GeminiClient, SentimentSummarizer};
use terminal_services::{MarketDataService, PollingOrchestrator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ServerConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<PollingOrchestrator>,
    pub market_data: Arc<MarketDataService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,terminal_api=debug,terminal_services=debug")
        }))
        .init();

    info!("Starting Orange Reactor API");

    let config = ServerConfig::from_env()?;

    if config.gemini_api_key.is_some() {
        info!("Gemini credentials found, using model {}", config.gemini_model);
    } else {
        info!("No GEMINI_API_KEY set - analysis will report offline");
    }

    let market_data = Arc::new(MarketDataService::with_default_clients()?);
    let gemini = GeminiClient::new(config.gemini_api_key.clone())?.with_model(&config.gemini_model);
    let analyst = Arc::new(SentimentSummarizer::new(gemini));

    let orchestrator =
        PollingOrchestrator::new(market_data.clone(), analyst, config.polling.clone());
    orchestrator.start();

    let state = AppState {
        orchestrator: orchestrator.clone(),
        market_data,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    orchestrator.shutdown().await;
    info!("Server stopped");

    Ok(())
}

/// Router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::ws_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
