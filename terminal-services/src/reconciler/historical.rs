use chrono::NaiveDate;
use rust_decimal::Decimal;
use terminal_coingecko::{DayMarketData, PricePoint};
use terminal_core::{HistoricalSnapshot, TerminalResult};
use tracing::debug;

/// Combine a day snapshot with the intraday price range, if any
///
/// High and low are only reported for a non-empty range with positive prices.
pub fn reconcile_historical(
    date: NaiveDate,
    day: DayMarketData,
    range: TerminalResult<Vec<PricePoint>>,
) -> HistoricalSnapshot {
    let (high, low) = match range {
        Ok(points) => {
            let high = points.iter().map(|p| p.price).max();
            let low = points.iter().map(|p| p.price).min();
            (high.filter(is_positive), low.filter(is_positive))
        }
        Err(e) => {
            debug!("No intraday range for {}: {}", date, e);
            (None, None)
        }
    };

    HistoricalSnapshot {
        date,
        price: day.price,
        market_cap: day.market_cap,
        volume: day.volume,
        high,
        low,
    }
}

fn is_positive(value: &Decimal) -> bool {
    *value > Decimal::ZERO
}
