//! Market data structures for the BTC/USD dashboard

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Circulating supply assumed for the exchange-side market cap estimate,
/// used only until the metadata provider reports real supply figures.
pub const ASSUMED_CIRCULATING_SUPPLY: Decimal = Decimal::from_parts(19_800_000, 0, 0, false, 0);

/// Performance window reported by the metadata provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeWindow {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "60d")]
    SixtyDays,
    #[serde(rename = "1y")]
    OneYear,
}

impl ChangeWindow {
    pub const ALL: [ChangeWindow; 6] = [
        ChangeWindow::OneHour,
        ChangeWindow::TwentyFourHours,
        ChangeWindow::SevenDays,
        ChangeWindow::ThirtyDays,
        ChangeWindow::SixtyDays,
        ChangeWindow::OneYear,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeWindow::OneHour => "1h",
            ChangeWindow::TwentyFourHours => "24h",
            ChangeWindow::SevenDays => "7d",
            ChangeWindow::ThirtyDays => "30d",
            ChangeWindow::SixtyDays => "60d",
            ChangeWindow::OneYear => "1y",
        }
    }
}

impl std::fmt::Display for ChangeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized exchange ticker for the BTC/USD pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerQuote {
    /// Last trade price
    pub price: Decimal,
    /// Today's opening price
    pub open: Decimal,
    /// Rolling 24h volume in BTC
    pub volume_base_24h: Decimal,
    /// Rolling 24h volume-weighted average price
    pub vwap_24h: Decimal,
}

impl TickerQuote {
    /// Percentage move since today's open on the same exchange
    pub fn change_24h_pct(&self) -> Decimal {
        if self.open.is_zero() {
            return Decimal::ZERO;
        }
        (self.price - self.open) / self.open * Decimal::ONE_HUNDRED
    }

    /// Single-exchange USD volume (base volume x VWAP)
    pub fn volume_usd_estimate(&self) -> Decimal {
        self.volume_base_24h * self.vwap_24h
    }

    /// Market cap from the last price and the assumed supply
    pub fn market_cap_estimate(&self) -> Decimal {
        self.price * ASSUMED_CIRCULATING_SUPPLY
    }
}

/// Global market metadata, covering every exchange the provider tracks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedStats {
    pub rank: Option<u32>,
    pub ath: Option<Decimal>,
    pub ath_change_pct: Option<Decimal>,
    pub high_24h: Option<Decimal>,
    pub low_24h: Option<Decimal>,
    pub circulating_supply: Option<Decimal>,
    pub total_supply: Option<Decimal>,
    pub market_cap_usd: Option<Decimal>,
    pub volume_24h_usd: Option<Decimal>,
    /// Only windows the provider actually reported
    pub change_windows: BTreeMap<ChangeWindow, Decimal>,
}

/// Canonical market view, rebuilt on every full refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Live spot price in USD, always taken from the exchange ticker
    pub price: Decimal,

    /// Market cap in USD (global figure when known, exchange estimate otherwise)
    pub market_cap_usd: Decimal,

    /// 24h volume in USD (global figure when known, exchange estimate otherwise)
    pub volume_24h_usd: Decimal,

    /// Change since today's open on the exchange; drives the live display
    pub change_24h_pct: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ath: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ath_change_pct: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_24h: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_24h: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<Decimal>,

    /// Multi-window performance panel. Its `24h` entry is the metadata
    /// provider's own figure and is independent of `change_24h_pct`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_windows: Option<BTreeMap<ChangeWindow, Decimal>>,

    pub last_updated: DateTime<Utc>,
}

impl MarketSnapshot {
    /// Patch live ticker fields in place, leaving extended stats untouched
    pub fn apply_ticker(&mut self, quote: &TickerQuote) {
        self.price = quote.price;
        self.change_24h_pct = quote.change_24h_pct();
    }

    /// Whether the metadata provider contributed to this snapshot
    pub fn has_extended_stats(&self) -> bool {
        self.change_windows.is_some()
    }
}

/// One calendar day of market history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSnapshot {
    pub date: NaiveDate,
    pub price: Decimal,
    pub market_cap: Decimal,
    pub volume: Decimal,
    /// Intraday high from the ranged price series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,
    /// Intraday low from the ranged price series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote() -> TickerQuote {
        TickerQuote {
            price: dec!(66000),
            open: dec!(64000),
            volume_base_24h: dec!(1500),
            vwap_24h: dec!(65000),
        }
    }

    #[test]
    fn test_ticker_derivations() {
        let q = quote();
        assert_eq!(q.change_24h_pct(), dec!(3.125));
        assert_eq!(q.volume_usd_estimate(), dec!(97500000));
        assert_eq!(q.market_cap_estimate(), dec!(1306800000000));
    }

    #[test]
    fn test_zero_open_has_no_change() {
        let q = TickerQuote {
            open: Decimal::ZERO,
            ..quote()
        };
        assert_eq!(q.change_24h_pct(), Decimal::ZERO);
    }

    #[test]
    fn test_change_window_serializes_as_label() {
        let mut windows = BTreeMap::new();
        windows.insert(ChangeWindow::SevenDays, dec!(1.5));
        windows.insert(ChangeWindow::OneHour, dec!(-0.2));
        let json = serde_json::to_string(&windows).unwrap();
        assert_eq!(json, r#"{"1h":"-0.2","7d":"1.5"}"#);
    }
}
