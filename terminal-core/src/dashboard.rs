//! The dashboard view model served to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AnalysisResult, ChartSeries, MarketSnapshot, NetworkSnapshot, TimeFrame};

/// Lifecycle phase of the polling orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    /// Cosmetic boot sequence, no polling yet
    #[default]
    Boot,
    /// Timers active
    Running,
    /// Torn down; late results are discarded
    Stopped,
}

/// Everything the dashboard renders, as of one state version
///
/// `None` fields mean no successful fetch has happened yet; after the first
/// success a field only ever changes to a newer value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub phase: Phase,
    pub timeframe: TimeFrame,
    pub market: Option<MarketSnapshot>,
    pub chart: Option<ChartSeries>,
    pub network: Option<NetworkSnapshot>,
    pub analysis: Option<AnalysisResult>,
    /// Manual refresh in progress
    pub refreshing: bool,
    /// AI request in flight
    pub analyzing: bool,
    /// Completion time of the last full refresh
    pub last_refresh: Option<DateTime<Utc>>,
    /// Bumped on every applied update
    pub version: u64,
}
