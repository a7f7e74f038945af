use chrono::{DateTime, Utc};
use terminal_core::{ExtendedStats, MarketSnapshot, TerminalResult, TickerQuote};
use tracing::warn;

/// Merge the exchange ticker with optional global metadata
///
/// Price and the 24h change always come from the ticker. Market cap and
/// volume prefer the metadata figure when it is present and non-zero and
/// fall back to exchange estimates. Everything else is metadata-only.
pub fn reconcile_market(
    quote: &TickerQuote,
    stats: TerminalResult<ExtendedStats>,
    now: DateTime<Utc>,
) -> MarketSnapshot {
    let stats = match stats {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!("Extended market stats unavailable, using exchange estimates: {}", e);
            None
        }
    };

    let market_cap_usd = stats
        .as_ref()
        .and_then(|s| s.market_cap_usd)
        .filter(|v| !v.is_zero())
        .unwrap_or_else(|| quote.market_cap_estimate());

    let volume_24h_usd = stats
        .as_ref()
        .and_then(|s| s.volume_24h_usd)
        .filter(|v| !v.is_zero())
        .unwrap_or_else(|| quote.volume_usd_estimate());

    let mut snapshot = MarketSnapshot {
        price: quote.price,
        market_cap_usd,
        volume_24h_usd,
        change_24h_pct: quote.change_24h_pct(),
        rank: None,
        ath: None,
        ath_change_pct: None,
        high_24h: None,
        low_24h: None,
        circulating_supply: None,
        total_supply: None,
        change_windows: None,
        last_updated: now,
    };

    if let Some(stats) = stats {
        snapshot.rank = stats.rank;
        snapshot.ath = stats.ath;
        snapshot.ath_change_pct = stats.ath_change_pct;
        snapshot.high_24h = stats.high_24h;
        snapshot.low_24h = stats.low_24h;
        snapshot.circulating_supply = stats.circulating_supply;
        snapshot.total_supply = stats.total_supply;
        snapshot.change_windows = Some(stats.change_windows);
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use terminal_core::{ChangeWindow, Provider, TerminalError};

    fn quote() -> TickerQuote {
        TickerQuote {
            price: dec!(60000),
            open: dec!(50000),
            volume_base_24h: dec!(1000),
            vwap_24h: dec!(59000),
        }
    }

    fn stats() -> ExtendedStats {
        let mut change_windows = BTreeMap::new();
        change_windows.insert(ChangeWindow::TwentyFourHours, dec!(4.2));
        ExtendedStats {
            rank: Some(1),
            ath: Some(dec!(73738)),
            ath_change_pct: Some(dec!(-18.6)),
            high_24h: Some(dec!(61000)),
            low_24h: Some(dec!(58000)),
            circulating_supply: Some(dec!(19700000)),
            total_supply: Some(dec!(21000000)),
            market_cap_usd: Some(dec!(1200000000000)),
            volume_24h_usd: Some(dec!(30000000000)),
            change_windows,
        }
    }

    #[test]
    fn test_metadata_cap_wins() {
        let snapshot = reconcile_market(&quote(), Ok(stats()), Utc::now());
        assert_eq!(snapshot.price, dec!(60000));
        assert_eq!(snapshot.market_cap_usd, dec!(1200000000000));
        assert_eq!(snapshot.volume_24h_usd, dec!(30000000000));
        assert_eq!(snapshot.rank, Some(1));
        assert!(snapshot.has_extended_stats());
    }

    #[test]
    fn test_estimates_without_metadata() {
        let err = TerminalError::http_status(Provider::CoinGecko, 429, "slow down");
        let snapshot = reconcile_market(&quote(), Err(err), Utc::now());
        assert_eq!(snapshot.price, dec!(60000));
        assert_eq!(snapshot.market_cap_usd, dec!(60000) * dec!(19800000));
        assert_eq!(snapshot.volume_24h_usd, dec!(59000000));
        assert_eq!(snapshot.change_24h_pct, dec!(20));
        assert_eq!(snapshot.rank, None);
        assert_eq!(snapshot.ath, None);
        assert!(snapshot.change_windows.is_none());
    }

    #[test]
    fn test_zero_metadata_cap_falls_back() {
        let mut s = stats();
        s.market_cap_usd = Some(Decimal::ZERO);
        s.volume_24h_usd = None;
        let snapshot = reconcile_market(&quote(), Ok(s), Utc::now());
        assert_eq!(snapshot.market_cap_usd, quote().market_cap_estimate());
        assert_eq!(snapshot.volume_24h_usd, dec!(59000000));
        // Metadata-only fields still come through
        assert_eq!(snapshot.ath, Some(dec!(73738)));
    }

    #[test]
    fn test_both_24h_figures_kept() {
        let snapshot = reconcile_market(&quote(), Ok(stats()), Utc::now());
        assert_eq!(snapshot.change_24h_pct, dec!(20));
        let windows = snapshot.change_windows.unwrap();
        assert_eq!(windows[&ChangeWindow::TwentyFourHours], dec!(4.2));
    }
}
