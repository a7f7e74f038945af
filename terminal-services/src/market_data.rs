//! Market data service
//!
//! Fans each dashboard fetch out across the upstream clients in parallel
//! and hands the raw results to the reconciler.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use terminal_coingecko::CoinGeckoClient;
use terminal_core::{
    ChartSeries, HistoricalSnapshot, MarketSnapshot, TerminalError, TerminalResult, TickerQuote,
    TimeFrame,
};
use terminal_kraken::KrakenClient;
use terminal_mempool::{BlockchainInfoClient, MempoolClient};
use tracing::{debug, info, instrument};

use crate::reconciler::{
    build_chart_series, reconcile_historical, reconcile_market, reconcile_network, NetworkInputs,
    NetworkReport,
};

/// The fetches the polling loop depends on
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Live exchange quote for the ticker patch
    async fn fetch_ticker(&self) -> TerminalResult<TickerQuote>;

    /// Full market snapshot; fails only when the exchange ticker fails
    async fn fetch_market(&self) -> TerminalResult<MarketSnapshot>;

    async fn fetch_chart(&self, timeframe: TimeFrame) -> TerminalResult<ChartSeries>;

    /// Never fails; a total outage is reported as a placeholder
    async fn fetch_network(&self) -> NetworkReport;
}

/// Service backed by the live provider clients
pub struct MarketDataService {
    kraken: Arc<KrakenClient>,
    coingecko: Arc<CoinGeckoClient>,
    mempool: Arc<MempoolClient>,
    blockchain_info: Arc<BlockchainInfoClient>,
}

impl MarketDataService {
    pub fn new(
        kraken: KrakenClient,
        coingecko: CoinGeckoClient,
        mempool: MempoolClient,
        blockchain_info: BlockchainInfoClient,
    ) -> Self {
        Self {
            kraken: Arc::new(kraken),
            coingecko: Arc::new(coingecko),
            mempool: Arc::new(mempool),
            blockchain_info: Arc::new(blockchain_info),
        }
    }

    /// Build a service against the public endpoints
    pub fn with_default_clients() -> TerminalResult<Self> {
        Ok(Self::new(
            KrakenClient::new()?,
            CoinGeckoClient::new()?,
            MempoolClient::new()?,
            BlockchainInfoClient::new()?,
        ))
    }

    /// Look up one calendar day (`YYYY-MM-DD`)
    ///
    /// Fails if the date is malformed or the day snapshot is unavailable.
    /// A failed intraday range only drops high/low.
    #[instrument(skip(self))]
    pub async fn historical(&self, date: &str) -> TerminalResult<HistoricalSnapshot> {
        let date = parse_history_date(date)?;

        let from = date.and_time(NaiveTime::MIN).and_utc();
        let to = from + Duration::hours(24);

        let (day, range) = tokio::join!(
            self.coingecko.history(date),
            self.coingecko.price_range(from, to)
        );

        Ok(reconcile_historical(date, day?, range))
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_history_date(date: &str) -> TerminalResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| TerminalError::malformed(format!("Invalid date '{}': {}", date, e)))
}

#[async_trait]
impl DashboardSource for MarketDataService {
    #[instrument(skip(self))]
    async fn fetch_ticker(&self) -> TerminalResult<TickerQuote> {
        self.kraken.ticker().await
    }

    #[instrument(skip(self))]
    async fn fetch_market(&self) -> TerminalResult<MarketSnapshot> {
        let (quote, stats) = tokio::join!(self.kraken.ticker(), self.coingecko.bitcoin_stats());
        let quote = quote?;

        let snapshot = reconcile_market(&quote, stats, Utc::now());
        debug!(
            "Market snapshot: price={} cap={} extended={}",
            snapshot.price,
            snapshot.market_cap_usd,
            snapshot.has_extended_stats()
        );
        Ok(snapshot)
    }

    #[instrument(skip(self))]
    async fn fetch_chart(&self, timeframe: TimeFrame) -> TerminalResult<ChartSeries> {
        let candles = self.kraken.ohlc(timeframe.candle_interval_minutes()).await?;
        let series = build_chart_series(candles, timeframe);
        debug!("Chart {} has {} points", timeframe, series.len());
        Ok(series)
    }

    #[instrument(skip(self))]
    async fn fetch_network(&self) -> NetworkReport {
        let (fees, blocks, difficulty, hashrate, mempool, pools, chain_stats) = tokio::join!(
            self.mempool.recommended_fees(),
            self.mempool.blocks(),
            self.mempool.difficulty_adjustment(),
            self.mempool.hashrate(),
            self.mempool.mempool(),
            self.mempool.mining_pools(),
            self.blockchain_info.stats(),
        );

        let report = reconcile_network(NetworkInputs {
            fees,
            blocks,
            difficulty,
            hashrate,
            mempool,
            pools,
            chain_stats,
        });

        if !report.placeholder {
            info!(
                "Network: height={} hashrate={:.1}EH/s pools={}",
                report.snapshot.height,
                report.snapshot.hashrate_eh,
                report.snapshot.pools.len()
            );
        }
        report
    }
}
