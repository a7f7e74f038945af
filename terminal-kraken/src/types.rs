//! Kraken API response types
//!
//! These types mirror the Kraken public API responses and are converted
//! to terminal-core types for use in the application. Kraken encodes
//! prices and volumes as decimal strings.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use terminal_core::{PriceCandle, TerminalError, TerminalResult, TickerQuote};

/// Envelope shared by every public endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenResponse<T> {
    /// Non-empty on failure, even with HTTP 200
    #[serde(default)]
    pub error: Vec<String>,

    pub result: Option<T>,
}

/// Response from GET /Ticker, keyed by pair name
pub type TickerResult = HashMap<String, KrakenTicker>;

/// Ticker fields for one pair
#[derive(Debug, Clone, Deserialize)]
pub struct KrakenTicker {
    /// Last trade closed: [price, lot volume]
    pub c: Vec<String>,

    /// Volume: [today, last 24 hours]
    pub v: Vec<String>,

    /// Volume weighted average price: [today, last 24 hours]
    pub p: Vec<String>,

    /// Today's opening price
    pub o: String,
}

impl KrakenTicker {
    /// Convert to the normalized quote
    pub fn to_quote(&self) -> TerminalResult<TickerQuote> {
        Ok(TickerQuote {
            price: parse_decimal("c[0]", self.c.first())?,
            open: parse_decimal("o", Some(&self.o))?,
            volume_base_24h: parse_decimal("v[1]", self.v.get(1))?,
            vwap_24h: parse_decimal("p[1]", self.p.get(1))?,
        })
    }
}

/// Response from GET /OHLC
///
/// Holds the pair's candle array plus a numeric `last` cursor, so values
/// are kept loosely typed until the pair is picked out.
pub type OhlcResult = HashMap<String, serde_json::Value>;

/// [time, open, high, low, close, vwap, volume, count]
pub type OhlcRow = (i64, String, String, String, String, String, String, u64);

/// Convert raw OHLC rows into candles, preserving exchange order
pub fn rows_to_candles(rows: Vec<OhlcRow>) -> TerminalResult<Vec<PriceCandle>> {
    rows.into_iter()
        .map(|(time, open, high, low, close, _vwap, _volume, _count)| {
            let timestamp = DateTime::from_timestamp(time, 0)
                .ok_or_else(|| TerminalError::malformed(format!("Bad candle time: {}", time)))?;
            Ok(PriceCandle {
                timestamp,
                open: parse_decimal("open", Some(&open))?,
                high: parse_decimal("high", Some(&high))?,
                low: parse_decimal("low", Some(&low))?,
                close: parse_decimal("close", Some(&close))?,
            })
        })
        .collect()
}

fn parse_decimal(field: &str, value: Option<&String>) -> TerminalResult<Decimal> {
    let raw = value.ok_or_else(|| TerminalError::malformed(format!("Missing field {}", field)))?;
    Decimal::from_str(raw)
        .map_err(|e| TerminalError::malformed(format!("Bad decimal in {} ({}): {}", field, raw, e)))
}
