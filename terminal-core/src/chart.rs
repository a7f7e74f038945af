//! Price chart series

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart window selectable in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFrame {
    #[default]
    #[serde(rename = "24H")]
    Day,
    #[serde(rename = "7D")]
    Week,
    #[serde(rename = "30D")]
    Month,
}

impl TimeFrame {
    /// Candle width requested from the exchange, in minutes
    pub fn candle_interval_minutes(&self) -> u32 {
        match self {
            TimeFrame::Day => 60,
            TimeFrame::Week => 240,
            TimeFrame::Month => 1440,
        }
    }

    /// Number of most recent candles kept in the series
    pub fn point_count(&self) -> usize {
        match self {
            TimeFrame::Day => 24,
            TimeFrame::Week => 42,
            TimeFrame::Month => 30,
        }
    }

    /// strftime pattern used for point labels
    pub fn label_format(&self) -> &'static str {
        match self {
            TimeFrame::Day => "%H:%M",
            TimeFrame::Week => "%a %H",
            TimeFrame::Month => "%b %-d",
        }
    }

    /// Format a candle timestamp as a point label
    pub fn label(&self, timestamp: DateTime<Utc>) -> String {
        timestamp.format(self.label_format()).to_string()
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Day => "24H",
            TimeFrame::Week => "7D",
            TimeFrame::Month => "30D",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "24H" | "1D" => Ok(TimeFrame::Day),
            "7D" | "1W" => Ok(TimeFrame::Week),
            "30D" | "1M" => Ok(TimeFrame::Month),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

/// OHLC candle as reported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCandle {
    /// Candle open time
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// A single labelled chart point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Chart series for one timeframe, ordered oldest to newest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub timeframe: TimeFrame,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Prices in chart order
    pub fn prices(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.iter().map(|p| p.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!("24H".parse::<TimeFrame>(), Ok(TimeFrame::Day));
        assert_eq!("7d".parse::<TimeFrame>(), Ok(TimeFrame::Week));
        assert_eq!("30D".parse::<TimeFrame>(), Ok(TimeFrame::Month));
        assert!("1Y".parse::<TimeFrame>().is_err());
    }

    #[test]
    fn test_timeframe_buckets() {
        assert_eq!(TimeFrame::Day.candle_interval_minutes(), 60);
        assert_eq!(TimeFrame::Day.point_count(), 24);
        assert_eq!(TimeFrame::Week.candle_interval_minutes(), 240);
        assert_eq!(TimeFrame::Week.point_count(), 42);
        assert_eq!(TimeFrame::Month.candle_interval_minutes(), 1440);
        assert_eq!(TimeFrame::Month.point_count(), 30);
    }

    #[test]
    fn test_labels() {
        // Friday
        let ts = Utc.with_ymd_and_hms(2024, 3, 8, 16, 0, 0).unwrap();
        assert_eq!(TimeFrame::Day.label(ts), "16:00");
        assert_eq!(TimeFrame::Week.label(ts), "Fri 16");
        assert_eq!(TimeFrame::Month.label(ts), "Mar 8");
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&TimeFrame::Week).unwrap(), r#""7D""#);
        let tf: TimeFrame = serde_json::from_str(r#""30D""#).unwrap();
        assert_eq!(tf, TimeFrame::Month);
    }
}
