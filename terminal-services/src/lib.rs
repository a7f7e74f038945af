//! Business logic services for the Orange Reactor terminal
//!
//! This crate turns raw provider payloads into the canonical dashboard
//! snapshots, fans fetches out across the upstream clients, and drives
//! the polling timers that keep the shared dashboard state fresh.

pub mod dashboard_state;
pub mod market_data;
pub mod orchestrator;
pub mod reconciler;

pub use dashboard_state::{DashboardState, StateUpdate};
pub use market_data::{parse_history_date, DashboardSource, MarketDataService};
pub use orchestrator::{PollingConfig, PollingOrchestrator};
pub use reconciler::{
    build_chart_series, collapse_pools, reconcile_historical, reconcile_market,
    reconcile_network, NetworkInputs, NetworkReport,
};
