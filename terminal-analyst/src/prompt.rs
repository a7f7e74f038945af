//! Prompt and response schema for market summaries

use rust_decimal::Decimal;
use serde_json::json;
use terminal_core::{ChartPoint, MarketSnapshot, Sentiment, TimeFrame};

/// Price action across the selected chart window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendContext {
    pub start: Decimal,
    pub end: Decimal,
    /// Percent change from first to last point
    pub change_pct: Decimal,
    pub high: Decimal,
    pub low: Decimal,
}

impl TrendContext {
    /// None for an empty series
    pub fn from_points(points: &[ChartPoint]) -> Option<Self> {
        let start = points.first()?.price;
        let end = points.last()?.price;
        let high = points.iter().map(|p| p.price).max()?;
        let low = points.iter().map(|p| p.price).min()?;

        let change_pct = if start.is_zero() {
            Decimal::ZERO
        } else {
            (end - start) / start * Decimal::ONE_HUNDRED
        };

        Some(Self {
            start,
            end,
            change_pct,
            high,
            low,
        })
    }
}

fn billions(value: Decimal) -> Decimal {
    (value / Decimal::from(1_000_000_000u64)).round_dp(2)
}

/// Build the analyst prompt from live metrics and the chart window
pub fn build_prompt(market: &MarketSnapshot, points: &[ChartPoint], timeframe: TimeFrame) -> String {
    let ath_line = match market.ath {
        Some(ath) => format!(
            "\n- All Time High: ${} ({}% away)",
            ath,
            market.ath_change_pct.unwrap_or_default().round_dp(2)
        ),
        None => String::new(),
    };

    let trend = match TrendContext::from_points(points) {
        Some(t) => format!(
            r#"SELECTED TIMEFRAME: {}
- Start Price: ${}
- End Price: ${}
- Period Trend: {}%
- Period High: ${}
- Period Low: ${}"#,
            timeframe,
            t.start.round_dp(2),
            t.end.round_dp(2),
            t.change_pct.round_dp(2),
            t.high.round_dp(2),
            t.low.round_dp(2),
        ),
        None => "No chart data available.".to_string(),
    };

    format!(
        r#"Identity: You are "NEXUS-7", an elite AI crypto-financial analyst integrated into a cyberpunk terminal.
Your task is to provide a SERIOUS, high-level technical analysis of the Bitcoin market.

Do not be generic. Use the specific numbers provided below.

LIVE METRICS:
- Current Price: ${}
- 24h Change: {}%
- Volume: ${} Billion
- Market Cap: ${} Billion{}

HISTORICAL CONTEXT (Chart Data):
{}

INSTRUCTIONS:
1. Analyze the correlation between volume and price action.
2. Evaluate the trend strength based on the "Period Trend" and "24h Change".
3. Mention support or resistance levels if the price is near the Period Low or Period High.
4. Your tone must be cold, analytical and authoritative, using cyberpunk terminology (e.g. "signals", "resistance vector", "accumulation zones").
5. The 'analysis' text must be 1-2 sharp, insightful sentences. NO FLUFF.

JSON RESPONSE FORMAT:
{{
  "sentiment": "BULLISH" | "BEARISH" | "NEUTRAL",
  "confidence": (number 1-100),
  "analysis": "string",
  "recommendation": "ACCUMULATE" | "LIQUIDATE" | "HODL" | "OBSERVE"
}}"#,
        market.price,
        market.change_24h_pct.round_dp(2),
        billions(market.volume_24h_usd),
        billions(market.market_cap_usd),
        ath_line,
        trend,
    )
}

/// Gemini response schema for [`AnalysisResult`](terminal_core::AnalysisResult)
pub fn response_schema() -> serde_json::Value {
    let sentiments: Vec<&str> = Sentiment::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": { "type": "STRING", "enum": sentiments },
            "confidence": { "type": "NUMBER" },
            "analysis": { "type": "STRING" },
            "recommendation": { "type": "STRING" }
        },
        "required": ["sentiment", "confidence", "analysis", "recommendation"]
    })
}
