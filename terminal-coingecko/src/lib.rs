//! CoinGecko integration for the Orange Reactor terminal
//!
//! This crate provides a client for the free CoinGecko v3 API: global
//! market metadata for bitcoin (rank, ATH, supplies, multi-window
//! performance) and per-day history lookups.

pub mod client;
pub mod types;

pub use client::CoinGeckoClient;
pub use types::{DayMarketData, PricePoint};
