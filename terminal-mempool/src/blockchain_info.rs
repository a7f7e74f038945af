//! blockchain.info stats client

use crate::types::ChainStats;
use reqwest::Client;
use std::time::Duration;
use terminal_core::{Provider, TerminalError, TerminalResult};
use tracing::{debug, instrument};

const BLOCKCHAIN_INFO_API_BASE: &str = "https://api.blockchain.info";

#[derive(Clone)]
pub struct BlockchainInfoClient {
    client: Client,
    base_url: String,
}

impl BlockchainInfoClient {
    pub fn new() -> TerminalResult<Self> {
        Self::with_base_url(BLOCKCHAIN_INFO_API_BASE)
    }

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

    /// Fetch global chain statistics
    #[instrument(skip(self))]
    pub async fn stats(&self) -> TerminalResult<ChainStats> {
        let url = format!("{}/stats", self.base_url);

        debug!("Fetching blockchain.info {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("cors", "true")])
            .send()
            .await
            .map_err(|e| TerminalError::network(format!("Failed to fetch stats: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TerminalError::http_status(
                Provider::BlockchainInfo,
                status.as_u16(),
                body,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| TerminalError::malformed(format!("Failed to parse stats response: {}", e)))
    }
}
