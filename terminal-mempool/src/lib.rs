//! Bitcoin network statistics for the Orange Reactor terminal
//!
//! Two public, keyless sources are wrapped here:
//! - mempool.space for the chain tip, fees, difficulty epoch, hashrate,
//!   mempool backlog and mining pool distribution
//! - blockchain.info for chain stats, used as the preferred difficulty figure

pub mod blockchain_info;
pub mod client;
pub mod types;

pub use blockchain_info::BlockchainInfoClient;
pub use client::MempoolClient;
pub use types::{
    BlockSummary, ChainStats, DifficultyAdjustment, HashrateResponse, MempoolStats, PoolEntry,
    PoolsResponse, RecommendedFees,
};
