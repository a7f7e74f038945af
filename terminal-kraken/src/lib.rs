//! Kraken integration for the Orange Reactor terminal
//!
//! This crate provides a client for Kraken's public REST API: the BTC/USD
//! spot ticker (live price, session open, 24h volume and VWAP) and OHLC
//! candles for the price chart.

pub mod client;
pub mod types;

pub use client::{KrakenClient, BTC_USD_PAIR};
