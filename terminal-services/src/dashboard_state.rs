//! Shared dashboard state
//!
//! One container holds everything the dashboard renders. Writers go through
//! [`DashboardState::apply`], which replaces whole values (or patches the
//! live ticker fields) under a short write lock and bumps the version that
//! readers watch.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use terminal_core::{
    AnalysisResult, ChartSeries, DashboardView, MarketSnapshot, NetworkSnapshot, Phase,
    TickerQuote, TimeFrame,
};
use tokio::sync::watch;
use tracing::debug;

/// A single write to the dashboard state
#[derive(Debug, Clone)]
pub enum StateUpdate {
    Phase(Phase),
    Timeframe(TimeFrame),
    Market(MarketSnapshot),
    /// Patch price and 24h change into the held market snapshot
    Ticker(TickerQuote),
    Chart(ChartSeries),
    /// A placeholder never replaces a real snapshot
    Network {
        snapshot: NetworkSnapshot,
        placeholder: bool,
    },
    Analysis(AnalysisResult),
    Refreshing(bool),
    Analyzing(bool),
    RefreshCompleted(DateTime<Utc>),
}

pub struct DashboardState {
    view: RwLock<DashboardView>,
    version_tx: watch::Sender<u64>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            view: RwLock::new(DashboardView::default()),
            version_tx,
        }
    }

    /// Copy of the current view
    pub fn snapshot(&self) -> DashboardView {
        self.view.read().clone()
    }

    pub fn phase(&self) -> Phase {
        self.view.read().phase
    }

    pub fn timeframe(&self) -> TimeFrame {
        self.view.read().timeframe
    }

    pub fn version(&self) -> u64 {
        self.view.read().version
    }

    /// Receiver that wakes on every applied update
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    /// Apply an update, returning whether anything changed
    ///
    /// Everything is discarded once the phase is `Stopped`.
    pub fn apply(&self, update: StateUpdate) -> bool {
        let version = {
            let mut view = self.view.write();

            if view.phase == Phase::Stopped {
                debug!("Dropping update after shutdown: {:?}", update_kind(&update));
                return false;
            }

            match update {
                StateUpdate::Phase(phase) => view.phase = phase,
                StateUpdate::Timeframe(timeframe) => view.timeframe = timeframe,
                StateUpdate::Market(market) => view.market = Some(market),
                StateUpdate::Ticker(quote) => match view.market.as_mut() {
                    Some(market) => market.apply_ticker(&quote),
                    None => return false,
                },
                StateUpdate::Chart(chart) => view.chart = Some(chart),
                StateUpdate::Network {
                    snapshot,
                    placeholder,
                } => {
                    if placeholder && view.network.is_some() {
                        debug!("Keeping last good network snapshot over placeholder");
                        return false;
                    }
                    view.network = Some(snapshot);
                }
                StateUpdate::Analysis(analysis) => view.analysis = Some(analysis),
                StateUpdate::Refreshing(on) => view.refreshing = on,
                StateUpdate::Analyzing(on) => view.analyzing = on,
                StateUpdate::RefreshCompleted(at) => view.last_refresh = Some(at),
            }

            view.version += 1;
            view.version
        };

        self.version_tx.send_replace(version);
        true
    }
}

fn update_kind(update: &StateUpdate) -> &'static str {
    match update {
        StateUpdate::Phase(_) => "phase",
        StateUpdate::Timeframe(_) => "timeframe",
        StateUpdate::Market(_) => "market",
        StateUpdate::Ticker(_) => "ticker",
        StateUpdate::Chart(_) => "chart",
        StateUpdate::Network { .. } => "network",
        StateUpdate::Analysis(_) => "analysis",
        StateUpdate::Refreshing(_) => "refreshing",
        StateUpdate::Analyzing(_) => "analyzing",
        StateUpdate::RefreshCompleted(_) => "refresh_completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market() -> MarketSnapshot {
        MarketSnapshot {
            price: dec!(60000),
            market_cap_usd: dec!(1188000000000),
            volume_24h_usd: dec!(59000000),
            change_24h_pct: dec!(1),
            rank: Some(1),
            ath: Some(dec!(73738)),
            ath_change_pct: None,
            high_24h: None,
            low_24h: None,
            circulating_supply: None,
            total_supply: None,
            change_windows: None,
            last_updated: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn quote(price: rust_decimal::Decimal) -> TickerQuote {
        TickerQuote {
            price,
            open: dec!(50000),
            volume_base_24h: dec!(1),
            vwap_24h: dec!(1),
        }
    }

    #[test]
    fn test_version_bumps_and_publishes() {
        let state = DashboardState::new();
        let rx = state.subscribe();
        assert_eq!(state.version(), 0);

        assert!(state.apply(StateUpdate::Timeframe(TimeFrame::Month)));
        assert_eq!(state.version(), 1);
        assert_eq!(*rx.borrow(), 1);
        assert_eq!(state.snapshot().timeframe, TimeFrame::Month);
    }

    #[test]
    fn test_ticker_without_market_is_noop() {
        let state = DashboardState::new();
        assert!(!state.apply(StateUpdate::Ticker(quote(dec!(61000)))));
        assert!(state.snapshot().market.is_none());
        assert_eq!(state.version(), 0);
    }

    #[test]
    fn test_ticker_patch_is_idempotent() {
        let state = DashboardState::new();
        state.apply(StateUpdate::Market(market()));

        state.apply(StateUpdate::Ticker(quote(dec!(61000))));
        let once = state.snapshot().market.unwrap();
        state.apply(StateUpdate::Ticker(quote(dec!(61000))));
        let twice = state.snapshot().market.unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.price, dec!(61000));
        assert_eq!(once.change_24h_pct, dec!(22));
        // Only the live fields move
        assert_eq!(once.market_cap_usd, market().market_cap_usd);
        assert_eq!(once.ath, Some(dec!(73738)));
        assert_eq!(once.last_updated, market().last_updated);
    }

    #[test]
    fn test_placeholder_does_not_replace_real_network() {
        let state = DashboardState::new();

        let mut real = NetworkSnapshot::placeholder();
        real.height = 892_500;
        state.apply(StateUpdate::Network {
            snapshot: real.clone(),
            placeholder: false,
        });

        let applied = state.apply(StateUpdate::Network {
            snapshot: NetworkSnapshot::placeholder(),
            placeholder: true,
        });
        assert!(!applied);
        assert_eq!(state.snapshot().network, Some(real));
    }

    #[test]
    fn test_placeholder_fills_empty_network() {
        let state = DashboardState::new();
        state.apply(StateUpdate::Network {
            snapshot: NetworkSnapshot::placeholder(),
            placeholder: true,
        });
        assert_eq!(state.snapshot().network, Some(NetworkSnapshot::placeholder()));
    }

    #[test]
    fn test_writes_dropped_after_stop() {
        let state = DashboardState::new();
        state.apply(StateUpdate::Phase(Phase::Stopped));
        let version = state.version();

        assert!(!state.apply(StateUpdate::Market(market())));
        assert!(!state.apply(StateUpdate::Phase(Phase::Running)));
        assert_eq!(state.version(), version);
        assert_eq!(state.phase(), Phase::Stopped);
        assert!(state.snapshot().market.is_none());
    }
}
