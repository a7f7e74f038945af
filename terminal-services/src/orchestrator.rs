//! Polling orchestrator
//!
//! Drives the dashboard lifecycle: a short boot phase, then two timers
//! (full refresh with analysis, and a fast ticker patch) until shutdown.
//! All results land in the shared [`DashboardState`]; fetch failures are
//! logged and leave the previous values in place.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use terminal_analyst::SentimentModel;
use terminal_core::{MarketSnapshot, Phase, TimeFrame};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::dashboard_state::{DashboardState, StateUpdate};
use crate::market_data::DashboardSource;

/// Timer configuration
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Full refresh and analysis period (first run is immediate)
    pub full_refresh_interval: Duration,
    /// Ticker patch period (first run after one period)
    pub ticker_interval: Duration,
    /// Minimum time the refreshing flag stays up on a manual refresh
    pub min_manual_refresh: Duration,
    /// Length of the cosmetic boot phase
    pub boot_duration: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            full_refresh_interval: Duration::from_secs(60),
            ticker_interval: Duration::from_secs(5),
            min_manual_refresh: Duration::from_millis(600),
            boot_duration: Duration::from_secs(4),
        }
    }
}

pub struct PollingOrchestrator {
    source: Arc<dyn DashboardSource>,
    analyst: Arc<dyn SentimentModel>,
    state: Arc<DashboardState>,
    config: PollingConfig,
    boot_skip: Notify,
    shutdown_tx: watch::Sender<bool>,
    manual_in_flight: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PollingOrchestrator {
    pub fn new(
        source: Arc<dyn DashboardSource>,
        analyst: Arc<dyn SentimentModel>,
        config: PollingConfig,
    ) -> Arc<Self> {
        let (shutdown_tx, _) = watch::channel(false);
        Arc::new(Self {
            source,
            analyst,
            state: Arc::new(DashboardState::new()),
            config,
            boot_skip: Notify::new(),
            shutdown_tx,
            manual_in_flight: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn state(&self) -> Arc<DashboardState> {
        self.state.clone()
    }

    pub fn config(&self) -> &PollingConfig {
        &self.config
    }

    /// Begin the boot phase; timers start once it ends
    pub fn start(self: &Arc<Self>) {
        let this = self.clone();
        let mut shutdown = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            if *shutdown.borrow_and_update() {
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(this.config.boot_duration) => {
                    debug!("Boot sequence finished");
                }
                _ = this.boot_skip.notified() => {
                    info!("Boot sequence skipped");
                }
                _ = shutdown.changed() => return,
            }

            if !this.state.apply(StateUpdate::Phase(Phase::Running)) {
                return;
            }
            info!("Dashboard running");

            let full = this.clone().spawn_full_refresh_loop();
            let ticker = this.clone().spawn_ticker_loop();
            this.tasks.lock().extend([full, ticker]);
        });

        self.tasks.lock().push(handle);
    }

    /// End the boot phase early
    pub fn skip_boot(&self) {
        if self.state.phase() == Phase::Boot {
            self.boot_skip.notify_one();
        }
    }

    fn spawn_full_refresh_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = self.config.full_refresh_interval;
            let mut interval = interval_at(Instant::now(), period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut shutdown = self.shutdown_tx.subscribe();
            if *shutdown.borrow() {
                return;
            }

            loop {
                tokio::select! {
                    _ = interval.tick() => self.full_refresh().await,
                    _ = shutdown.changed() => break,
                }
            }
            debug!("Full refresh loop stopped");
        })
    }

    fn spawn_ticker_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = self.config.ticker_interval;
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut shutdown = self.shutdown_tx.subscribe();
            if *shutdown.borrow() {
                return;
            }

            loop {
                tokio::select! {
                    _ = interval.tick() => self.ticker_refresh().await,
                    _ = shutdown.changed() => break,
                }
            }
            debug!("Ticker loop stopped");
        })
    }

    /// Refetch market, chart and network, then analyse if the market came back
    #[instrument(skip(self))]
    pub async fn full_refresh(&self) {
        if let Some(market) = self.fetch_and_apply().await {
            self.run_analysis(market).await;
        }
    }

    /// Manual refresh with a visible minimum duration
    ///
    /// Ignored while another manual refresh is still running.
    #[instrument(skip(self))]
    pub async fn manual_refresh(&self) {
        if self.manual_in_flight.swap(true, Ordering::AcqRel) {
            debug!("Manual refresh already in progress");
            return;
        }

        let started = Instant::now();
        self.state.apply(StateUpdate::Refreshing(true));

        let market = self.fetch_and_apply().await;

        let elapsed = started.elapsed();
        if elapsed < self.config.min_manual_refresh {
            tokio::time::sleep(self.config.min_manual_refresh - elapsed).await;
        }
        self.state.apply(StateUpdate::Refreshing(false));
        self.manual_in_flight.store(false, Ordering::Release);

        if let Some(market) = market {
            self.run_analysis(market).await;
        }
    }

    /// Patch the live price into the held market snapshot
    #[instrument(skip(self))]
    pub async fn ticker_refresh(&self) {
        match self.source.fetch_ticker().await {
            Ok(quote) => {
                if !self.state.apply(StateUpdate::Ticker(quote)) {
                    debug!("No market snapshot to patch yet");
                }
            }
            Err(e) => warn!("Ticker refresh failed: {}", e),
        }
    }

    /// Select the chart window; picked up by the next refresh
    pub fn set_timeframe(&self, timeframe: TimeFrame) {
        if self.state.timeframe() != timeframe {
            info!("Timeframe set to {}", timeframe);
            self.state.apply(StateUpdate::Timeframe(timeframe));
        }
    }

    /// Stop all timers; late results are discarded
    pub async fn shutdown(&self) {
        info!("Stopping dashboard orchestrator");
        self.shutdown_tx.send_replace(true);
        self.state.apply(StateUpdate::Phase(Phase::Stopped));

        // Loops spawned by the boot task may register after the first drain
        loop {
            let handles: Vec<JoinHandle<()>> = self.tasks.lock().drain(..).collect();
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!("Polling task ended abnormally: {}", e);
                }
            }
        }
    }

    async fn fetch_and_apply(&self) -> Option<MarketSnapshot> {
        let timeframe = self.state.timeframe();

        let (market, chart, network) = tokio::join!(
            self.source.fetch_market(),
            self.source.fetch_chart(timeframe),
            self.source.fetch_network()
        );

        let market = match market {
            Ok(market) => {
                self.state.apply(StateUpdate::Market(market.clone()));
                Some(market)
            }
            Err(e) => {
                warn!("Market refresh failed, keeping last snapshot: {}", e);
                None
            }
        };

        match chart {
            Ok(chart) => {
                self.state.apply(StateUpdate::Chart(chart));
            }
            Err(e) => warn!("Chart refresh failed, keeping last series: {}", e),
        }

        self.state.apply(StateUpdate::Network {
            snapshot: network.snapshot,
            placeholder: network.placeholder,
        });

        self.state.apply(StateUpdate::RefreshCompleted(Utc::now()));
        market
    }

    async fn run_analysis(&self, market: MarketSnapshot) {
        let view = self.state.snapshot();
        if view.phase == Phase::Stopped {
            return;
        }

        // Label the points with the window they were fetched for
        let (points, timeframe) = match view.chart {
            Some(chart) => (chart.points, chart.timeframe),
            None => (Vec::new(), view.timeframe),
        };

        self.state.apply(StateUpdate::Analyzing(true));
        let result = self.analyst.summarize(&market, &points, timeframe).await;
        self.state.apply(StateUpdate::Analysis(result));
        self.state.apply(StateUpdate::Analyzing(false));
    }
}
