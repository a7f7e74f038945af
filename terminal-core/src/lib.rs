//! Core types for the Orange Reactor market terminal
//!
//! This crate defines the shared data structures used across the terminal:
//! the canonical market, chart and network snapshots, AI sentiment results,
//! the dashboard view model and the error taxonomy for upstream providers.

pub mod analysis;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod market;
pub mod network;
pub mod provider;
pub mod websocket;

pub use analysis::{AnalysisResult, Sentiment};
pub use chart::{ChartPoint, ChartSeries, PriceCandle, TimeFrame};
pub use dashboard::{DashboardView, Phase};
pub use error::{TerminalError, TerminalResult};
pub use market::{
    ChangeWindow, ExtendedStats, HistoricalSnapshot, MarketSnapshot, TickerQuote,
    ASSUMED_CIRCULATING_SUPPLY,
};
pub use network::{
    FeeRates, HalvingStatus, MempoolSummary, MiningPool, NetworkSnapshot, HALVING_INTERVAL,
    NEXT_HALVING_HEIGHT,
};
pub use provider::Provider;
pub use websocket::{ClientMessage, ErrorCode, ServerMessage};
