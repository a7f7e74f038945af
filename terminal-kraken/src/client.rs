//! Kraken API client
//!
//! Provides methods for the public (unauthenticated) Kraken REST endpoints.

use crate::types::{rows_to_candles, KrakenResponse, OhlcResult, OhlcRow, TickerResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use terminal_core::{PriceCandle, Provider, TerminalError, TerminalResult, TickerQuote};
use tracing::{debug, instrument};

/// Base URL for Kraken public API
const KRAKEN_API_BASE: &str = "https://api.kraken.com/0/public";

/// Kraken's name for the XBT/USD pair
pub const BTC_USD_PAIR: &str = "XXBTZUSD";

/// Kraken API client
#[derive(Clone)]
pub struct KrakenClient {
    client: Client,
    base_url: String,
    pair: String,
}

impl KrakenClient {
    /// Create a new Kraken client against the production API
    pub fn new() -> TerminalResult<Self> {
        Self::with_base_url(KRAKEN_API_BASE)
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
            pair: BTC_USD_PAIR.to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the live BTC/USD ticker
    #[instrument(skip(self))]
    pub async fn ticker(&self) -> TerminalResult<TickerQuote> {
        let result: TickerResult = self.get("Ticker", &[("pair", self.pair.clone())]).await?;

        let ticker = result
            .get(&self.pair)
            .ok_or_else(|| TerminalError::malformed(format!("Ticker missing pair {}", self.pair)))?;

        let quote = ticker.to_quote()?;
        debug!("Kraken ticker: price={} open={}", quote.price, quote.open);
        Ok(quote)
    }

    /// Fetch OHLC candles at the given width, oldest first
    #[instrument(skip(self))]
    pub async fn ohlc(&self, interval_minutes: u32) -> TerminalResult<Vec<PriceCandle>> {
        let mut result: OhlcResult = self
            .get(
                "OHLC",
                &[
                    ("pair", self.pair.clone()),
                    ("interval", interval_minutes.to_string()),
                ],
            )
            .await?;

        let raw = result
            .remove(&self.pair)
            .ok_or_else(|| TerminalError::malformed(format!("OHLC missing pair {}", self.pair)))?;

        let rows: Vec<OhlcRow> = serde_json::from_value(raw)
            .map_err(|e| TerminalError::malformed(format!("Failed to parse OHLC rows: {}", e)))?;

        debug!("Got {} Kraken candles at {}m", rows.len(), interval_minutes);
        rows_to_candles(rows)
    }

    /// GET a public endpoint and unwrap Kraken's `{error, result}` envelope
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> TerminalResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!("Fetching Kraken {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| TerminalError::network(format!("Failed to fetch {}: {}", endpoint, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TerminalError::http_status(Provider::Kraken, status.as_u16(), body));
        }

        let envelope: KrakenResponse<T> = response.json().await.map_err(|e| {
            TerminalError::malformed(format!("Failed to parse {} response: {}", endpoint, e))
        })?;

        if !envelope.error.is_empty() {
            return Err(TerminalError::provider(Provider::Kraken, envelope.error.join(", ")));
        }

        envelope
            .result
            .ok_or_else(|| TerminalError::malformed(format!("{} response has no result", endpoint)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ticker_parses_pair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Ticker"))
            .and(query_param("pair", BTC_USD_PAIR))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": [],
                "result": {
                    "XXBTZUSD": {
                        "c": ["66000.0", "0.1"],
                        "v": ["10.0", "1500.0"],
                        "p": ["65500.0", "65000.0"],
                        "o": "64000.0"
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = KrakenClient::with_base_url(server.uri()).unwrap();
        let quote = client.ticker().await.unwrap();
        assert_eq!(quote.price, dec!(66000));
        assert_eq!(quote.change_24h_pct(), dec!(3.125));
    }

    #[tokio::test]
    async fn test_provider_error_array_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Ticker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": ["EGeneral:Too many requests"]
            })))
            .mount(&server)
            .await;

        let client = KrakenClient::with_base_url(server.uri()).unwrap();
        let err = client.ticker().await.unwrap_err();
        assert!(matches!(
            err,
            TerminalError::Provider {
                provider: Provider::Kraken,
                status: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_http_error_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/OHLC"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = KrakenClient::with_base_url(server.uri()).unwrap();
        let err = client.ohlc(60).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_ohlc_requests_interval() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/OHLC"))
            .and(query_param("interval", "240"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": [],
                "result": {
                    "XXBTZUSD": [
                        [1709913600, "1", "2", "0.5", "1.5", "1.2", "10", 5]
                    ],
                    "last": 1709913600
                }
            })))
            .mount(&server)
            .await;

        let client = KrakenClient::with_base_url(server.uri()).unwrap();
        let candles = client.ohlc(240).await.unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, dec!(1.5));
    }
}
