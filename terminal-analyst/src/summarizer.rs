//! Sentiment summarizer
//!
//! Wraps [`GeminiClient`] so callers always get an [`AnalysisResult`]:
//! an unconfigured key yields the offline answer, and any request or
//! parse failure yields the interrupted answer.

use crate::gemini::GeminiClient;
use crate::prompt::{build_prompt, response_schema};
use async_trait::async_trait;
use serde::Deserialize;
use terminal_core::{
    AnalysisResult, ChartPoint, MarketSnapshot, Sentiment, TerminalError, TerminalResult,
    TimeFrame,
};
use tracing::{debug, info, instrument, warn};

/// Anything that can turn a market view into a sentiment summary
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Must not fail; degrade to a canned result instead
    async fn summarize(
        &self,
        market: &MarketSnapshot,
        points: &[ChartPoint],
        timeframe: TimeFrame,
    ) -> AnalysisResult;
}

pub struct SentimentSummarizer {
    client: GeminiClient,
}

impl SentimentSummarizer {
    pub fn new(client: GeminiClient) -> Self {
        if !client.has_credential() {
            warn!("No Gemini API key configured, analysis will run in offline mode");
        }
        Self { client }
    }

    async fn request(
        &self,
        market: &MarketSnapshot,
        points: &[ChartPoint],
        timeframe: TimeFrame,
    ) -> TerminalResult<AnalysisResult> {
        let prompt = build_prompt(market, points, timeframe);
        let text = self.client.generate_json(&prompt, response_schema()).await?;
        parse_analysis(&text)
    }
}

#[async_trait]
impl SentimentModel for SentimentSummarizer {
    #[instrument(skip(self, market, points))]
    async fn summarize(
        &self,
        market: &MarketSnapshot,
        points: &[ChartPoint],
        timeframe: TimeFrame,
    ) -> AnalysisResult {
        if !self.client.has_credential() {
            return AnalysisResult::offline();
        }

        match self.request(market, points, timeframe).await {
            Ok(result) => {
                info!(
                    "Analysis: {} ({}%) {}",
                    result.sentiment, result.confidence, result.recommendation
                );
                result
            }
            Err(e) => {
                warn!("AI analysis failed: {}", e);
                AnalysisResult::interrupted()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    sentiment: Sentiment,
    confidence: f64,
    analysis: String,
    recommendation: String,
}

/// Parse model output into a result, clamping confidence to 0-100
pub fn parse_analysis(text: &str) -> TerminalResult<AnalysisResult> {
    let json = extract_json(text)?;
    let raw: RawAnalysis = serde_json::from_str(json)
        .map_err(|e| TerminalError::malformed(format!("Failed to parse analysis: {}", e)))?;

    if !raw.confidence.is_finite() {
        return Err(TerminalError::malformed("Confidence is not a number"));
    }

    let confidence = raw.confidence.round().clamp(0.0, 100.0) as u8;
    debug!("Parsed analysis with confidence {}", confidence);

    Ok(AnalysisResult {
        sentiment: raw.sentiment,
        confidence,
        analysis: raw.analysis,
        recommendation: raw.recommendation,
    })
}

/// Strip markdown fences or surrounding chatter around a JSON object
fn extract_json(content: &str) -> TerminalResult<&str> {
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim());
        }
    }

    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            if end > start {
                return Ok(&content[start..=end]);
            }
        }
    }

    Err(TerminalError::malformed("No JSON found in response"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn market() -> MarketSnapshot {
        MarketSnapshot {
            price: dec!(66000),
            market_cap_usd: dec!(1306800000000),
            volume_24h_usd: dec!(35000000000),
            change_24h_pct: dec!(1.5),
            rank: Some(1),
            ath: None,
            ath_change_pct: None,
            high_24h: None,
            low_24h: None,
            circulating_supply: None,
            total_supply: None,
            change_windows: None,
            last_updated: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_parse_clamps_confidence() {
        let result = parse_analysis(
            r#"{"sentiment":"BULLISH","confidence":142.7,"analysis":"Breakout.","recommendation":"ACCUMULATE"}"#,
        )
        .unwrap();
        assert_eq!(result.sentiment, Sentiment::Bullish);
        assert_eq!(result.confidence, 100);

        let result = parse_analysis(
            r#"{"sentiment":"BEARISH","confidence":-3,"analysis":"x","recommendation":"LIQUIDATE"}"#,
        )
        .unwrap();
        assert_eq!(result.confidence, 0);

        let result = parse_analysis(
            r#"{"sentiment":"NEUTRAL","confidence":66.5,"analysis":"x","recommendation":"OBSERVE"}"#,
        )
        .unwrap();
        assert_eq!(result.confidence, 67);
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "Here you go:\n```json\n{\"sentiment\":\"NEUTRAL\",\"confidence\":40,\"analysis\":\"Flat.\",\"recommendation\":\"HODL\"}\n```";
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.recommendation, "HODL");
    }

    #[test]
    fn test_parse_rejects_unknown_sentiment() {
        let err = parse_analysis(
            r#"{"sentiment":"MOON","confidence":99,"analysis":"x","recommendation":"y"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TerminalError::Malformed(_)));
        assert!(parse_analysis("not json at all").is_err());
    }

    #[tokio::test]
    async fn test_offline_without_key() {
        let summarizer = SentimentSummarizer::new(GeminiClient::new(None).unwrap());
        let result = summarizer.summarize(&market(), &[], TimeFrame::Day).await;
        assert_eq!(result, AnalysisResult::offline());
    }

    #[tokio::test]
    async fn test_network_error_falls_back() {
        // Nothing listens on the discard port
        let client =
            GeminiClient::with_base_url("http://127.0.0.1:9", Some("key".to_string())).unwrap();
        let summarizer = SentimentSummarizer::new(client);
        let result = summarizer.summarize(&market(), &[], TimeFrame::Day).await;
        assert_eq!(result, AnalysisResult::interrupted());
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(server.uri(), Some("key".to_string())).unwrap();
        let summarizer = SentimentSummarizer::new(client);
        let result = summarizer.summarize(&market(), &[], TimeFrame::Week).await;
        assert_eq!(result, AnalysisResult::interrupted());
    }

    #[tokio::test]
    async fn test_successful_summary() {
        let server = MockServer::start().await;
        let text = r#"{"sentiment":"BULLISH","confidence":81,"analysis":"Accumulation zone holding.","recommendation":"ACCUMULATE"}"#;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": text}]}}]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(server.uri(), Some("key".to_string())).unwrap();
        let summarizer = SentimentSummarizer::new(client);
        let result = summarizer.summarize(&market(), &[], TimeFrame::Month).await;
        assert_eq!(result.sentiment, Sentiment::Bullish);
        assert_eq!(result.confidence, 81);
    }
}
