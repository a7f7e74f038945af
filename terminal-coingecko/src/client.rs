//! CoinGecko API client
//!
//! The free tier is aggressively rate limited; a 429 surfaces as a
//! provider error with status and the caller falls back to exchange data.

use crate::types::{
    CoinResponse, DayMarketData, HistoryResponse, MarketChartResponse, PricePoint,
};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use terminal_core::{ExtendedStats, Provider, TerminalError, TerminalResult};
use tracing::{debug, instrument};

/// Base URL for CoinGecko API
const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API client
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Create a new CoinGecko client against the public API
    pub fn new() -> TerminalResult<Self> {
        Self::with_base_url(COINGECKO_API_BASE)
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

    /// Fetch global market metadata for bitcoin
    #[instrument(skip(self))]
    pub async fn bitcoin_stats(&self) -> TerminalResult<ExtendedStats> {
        let response: CoinResponse = self
            .get(
                "coins/bitcoin",
                &[
                    ("localization", "false".to_string()),
                    ("tickers", "false".to_string()),
                    ("community_data", "false".to_string()),
                    ("developer_data", "false".to_string()),
                    ("sparkline", "false".to_string()),
                ],
            )
            .await?;

        response.to_extended_stats()
    }

    /// Fetch the daily snapshot for a calendar date
    #[instrument(skip(self))]
    pub async fn history(&self, date: NaiveDate) -> TerminalResult<DayMarketData> {
        // CoinGecko expects DD-MM-YYYY
        let formatted = date.format("%d-%m-%Y").to_string();

        let response: HistoryResponse = self
            .get(
                "coins/bitcoin/history",
                &[("date", formatted), ("localization", "false".to_string())],
            )
            .await?;

        response.to_day_data()
    }

    /// Fetch the USD price series between two instants
    #[instrument(skip(self))]
    pub async fn price_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TerminalResult<Vec<PricePoint>> {
        let response: MarketChartResponse = self
            .get(
                "coins/bitcoin/market_chart/range",
                &[
                    ("vs_currency", "usd".to_string()),
                    ("from", from.timestamp().to_string()),
                    ("to", to.timestamp().to_string()),
                ],
            )
            .await?;

        let points = response.to_points();
        debug!("Got {} CoinGecko range points", points.len());
        Ok(points)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> TerminalResult<T> {
        let url = format!("{}/{}", self.base_url, path);

        debug!("Fetching CoinGecko {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| TerminalError::network(format!("Failed to fetch {}: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TerminalError::http_status(
                Provider::CoinGecko,
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
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::with_base_url(server.uri()).unwrap();
        let err = client.bitcoin_stats().await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_history_formats_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/history"))
            .and(query_param("date", "08-03-2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "bitcoin",
                "market_data": {
                    "current_price": {"usd": 68000.5},
                    "market_cap": {"usd": 1336000000000u64},
                    "total_volume": {"usd": 40000000000u64}
                }
            })))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::with_base_url(server.uri()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let day = client.history(date).await.unwrap();
        assert_eq!(day.price, dec!(68000.5));
        assert_eq!(day.volume, dec!(40000000000));
    }

    #[tokio::test]
    async fn test_price_range_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart/range"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("from", "1709856000"))
            .and(query_param("to", "1709942400"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prices": [[1709856000000u64, 66000.0], [1709859600000u64, 67000.0]]
            })))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::with_base_url(server.uri()).unwrap();
        let from = DateTime::from_timestamp(1709856000, 0).unwrap();
        let to = DateTime::from_timestamp(1709942400, 0).unwrap();
        let points = client.price_range(from, to).await.unwrap();
        assert_eq!(points.len(), 2);
    }
}
