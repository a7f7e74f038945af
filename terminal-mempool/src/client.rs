//! mempool.space API client

use crate::types::{
    BlockSummary, DifficultyAdjustment, HashrateResponse, MempoolStats, PoolsResponse,
    RecommendedFees,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use terminal_core::{Provider, TerminalError, TerminalResult};
use tracing::{debug, instrument};

/// Base URL for mempool.space REST API
const MEMPOOL_API_BASE: &str = "https://mempool.space/api";

/// Window used for hashrate and pool statistics
const MINING_WINDOW: &str = "3d";

/// mempool.space API client
#[derive(Clone)]
pub struct MempoolClient {
    client: Client,
    base_url: String,
}

impl MempoolClient {
    pub fn new() -> TerminalResult<Self> {
        Self::with_base_url(MEMPOOL_API_BASE)
    }

    /// Create a client against a different host (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> TerminalResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("OrangeReactor/1.0")
            .build()
            .map_err(|e| TerminalError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn recommended_fees(&self) -> TerminalResult<RecommendedFees> {
        self.get("v1/fees/recommended").await
    }

    /// Most recent blocks, tip first
    #[instrument(skip(self))]
    pub async fn blocks(&self) -> TerminalResult<Vec<BlockSummary>> {
        self.get("blocks").await
    }

    #[instrument(skip(self))]
    pub async fn difficulty_adjustment(&self) -> TerminalResult<DifficultyAdjustment> {
        self.get("v1/difficulty-adjustment").await
    }

    #[instrument(skip(self))]
    pub async fn hashrate(&self) -> TerminalResult<HashrateResponse> {
        self.get(&format!("v1/mining/hashrate/{}", MINING_WINDOW)).await
    }

    #[instrument(skip(self))]
    pub async fn mempool(&self) -> TerminalResult<MempoolStats> {
        self.get("mempool").await
    }

    #[instrument(skip(self))]
    pub async fn mining_pools(&self) -> TerminalResult<PoolsResponse> {
        self.get(&format!("v1/mining/pools/{}", MINING_WINDOW)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> TerminalResult<T> {
        let url = format!("{}/{}", self.base_url, path);

        debug!("Fetching mempool.space {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TerminalError::network(format!("Failed to fetch {}: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TerminalError::http_status(
                Provider::Mempool,
                status.as_u16(),
                body,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| TerminalError::malformed(format!("Failed to parse {} response: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mining/hashrate/3d"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"currentHashrate": 8.1e20})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mempool"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"count": 4200, "vsize": 2100000})),
            )
            .mount(&server)
            .await;

        let client = MempoolClient::with_base_url(server.uri()).unwrap();
        let hashrate = client.hashrate().await.unwrap();
        assert_eq!(hashrate.current_hashrate, Some(8.1e20));
        let mempool = client.mempool().await.unwrap();
        assert_eq!(mempool.count, Some(4200));
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blocks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = MempoolClient::with_base_url(server.uri()).unwrap();
        let err = client.blocks().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
