//! CoinGecko API response types
//!
//! CoinGecko nests most figures in per-currency maps (`{"usd": ...}`) and
//! freely returns `null` or `{}` for fields it has no data for, so every
//! leaf is optional here and the conversion decides what is required.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use terminal_core::{ChangeWindow, ExtendedStats, TerminalError, TerminalResult};

/// A `{"usd": value}` map; other currencies are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsdValue {
    #[serde(default)]
    pub usd: Option<Decimal>,
}

/// Response from GET /coins/bitcoin
#[derive(Debug, Clone, Deserialize)]
pub struct CoinResponse {
    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    #[serde(default)]
    pub market_data: Option<CoinMarketData>,
}

/// `market_data` block of the coin endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoinMarketData {
    pub ath: UsdValue,
    pub ath_change_percentage: UsdValue,
    pub high_24h: UsdValue,
    pub low_24h: UsdValue,
    pub market_cap: UsdValue,
    pub total_volume: UsdValue,
    pub circulating_supply: Option<Decimal>,
    pub total_supply: Option<Decimal>,
    pub price_change_percentage_1h_in_currency: UsdValue,
    pub price_change_percentage_24h_in_currency: UsdValue,
    pub price_change_percentage_7d_in_currency: UsdValue,
    pub price_change_percentage_30d_in_currency: UsdValue,
    pub price_change_percentage_60d_in_currency: UsdValue,
    pub price_change_percentage_1y_in_currency: UsdValue,
}

impl CoinResponse {
    /// Convert to normalized extended stats
    pub fn to_extended_stats(self) -> TerminalResult<ExtendedStats> {
        let md = self
            .market_data
            .ok_or_else(|| TerminalError::malformed("Coin response has no market_data"))?;

        let mut change_windows = BTreeMap::new();
        let windows = [
            (ChangeWindow::OneHour, &md.price_change_percentage_1h_in_currency),
            (ChangeWindow::TwentyFourHours, &md.price_change_percentage_24h_in_currency),
            (ChangeWindow::SevenDays, &md.price_change_percentage_7d_in_currency),
            (ChangeWindow::ThirtyDays, &md.price_change_percentage_30d_in_currency),
            (ChangeWindow::SixtyDays, &md.price_change_percentage_60d_in_currency),
            (ChangeWindow::OneYear, &md.price_change_percentage_1y_in_currency),
        ];
        for (window, value) in windows {
            if let Some(pct) = value.usd {
                change_windows.insert(window, pct);
            }
        }

        Ok(ExtendedStats {
            rank: self.market_cap_rank,
            ath: md.ath.usd,
            ath_change_pct: md.ath_change_percentage.usd,
            high_24h: md.high_24h.usd,
            low_24h: md.low_24h.usd,
            circulating_supply: md.circulating_supply,
            total_supply: md.total_supply,
            market_cap_usd: md.market_cap.usd,
            volume_24h_usd: md.total_volume.usd,
            change_windows,
        })
    }
}

/// Response from GET /coins/bitcoin/history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub market_data: Option<HistoryMarketData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryMarketData {
    pub current_price: UsdValue,
    pub market_cap: UsdValue,
    pub total_volume: UsdValue,
}

/// Price, cap and volume snapshot for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMarketData {
    pub price: Decimal,
    pub market_cap: Decimal,
    pub volume: Decimal,
}

impl HistoryResponse {
    /// Dates before listing (or in the future) come back without `market_data`
    pub fn to_day_data(self) -> TerminalResult<DayMarketData> {
        let md = self
            .market_data
            .ok_or_else(|| TerminalError::malformed("No market data for date"))?;

        Ok(DayMarketData {
            price: md
                .current_price
                .usd
                .ok_or_else(|| TerminalError::malformed("History missing current_price.usd"))?,
            market_cap: md.market_cap.usd.unwrap_or_default(),
            volume: md.total_volume.usd.unwrap_or_default(),
        })
    }
}

/// Response from GET /coins/bitcoin/market_chart/range
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    /// [unix millis, price]
    #[serde(default)]
    pub prices: Vec<(f64, Decimal)>,
}

/// One point of a ranged price series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

impl MarketChartResponse {
    pub fn to_points(self) -> Vec<PricePoint> {
        self.prices
            .into_iter()
            .filter_map(|(millis, price)| {
                DateTime::from_timestamp_millis(millis as i64)
                    .map(|timestamp| PricePoint { timestamp, price })
            })
            .collect()
    }
}
