//! mempool.space and blockchain.info response types
//!
//! Every figure is optional: the reconciler substitutes zeros (or a
//! documented default) for anything a provider leaves out.

use serde::Deserialize;

/// Response from GET /v1/fees/recommended (sat/vB)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendedFees {
    pub fastest_fee: Option<f64>,
    pub half_hour_fee: Option<f64>,
    pub hour_fee: Option<f64>,
    pub economy_fee: Option<f64>,
    pub minimum_fee: Option<f64>,
}

/// One entry of GET /blocks, newest first
#[derive(Debug, Clone, Deserialize)]
pub struct BlockSummary {
    pub height: u64,

    #[serde(default)]
    pub difficulty: Option<f64>,

    #[serde(default)]
    pub timestamp: Option<i64>,

    #[serde(default)]
    pub tx_count: Option<u64>,
}

/// Response from GET /v1/difficulty-adjustment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DifficultyAdjustment {
    pub progress_percent: Option<f64>,
    pub difficulty_change: Option<f64>,
    pub remaining_blocks: Option<u64>,
    /// Average block interval of the current epoch, in milliseconds
    pub time_avg: Option<f64>,
}

/// Response from GET /v1/mining/hashrate/{window}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HashrateResponse {
    /// H/s
    pub current_hashrate: Option<f64>,
    pub current_difficulty: Option<f64>,
}

/// Response from GET /mempool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MempoolStats {
    pub count: Option<u64>,
    pub vsize: Option<u64>,
    pub total_fee: Option<f64>,
}

/// Response from GET /v1/mining/pools/{window}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolsResponse {
    pub pools: Vec<PoolEntry>,
    /// Blocks found across the whole window
    pub block_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry {
    pub name: String,

    #[serde(default)]
    pub block_count: u64,

    #[serde(default)]
    pub slug: String,
}

/// Response from blockchain.info GET /stats
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChainStats {
    pub difficulty: Option<f64>,
    pub n_blocks_total: Option<u64>,
    pub hash_rate: Option<f64>,
    pub minutes_between_blocks: Option<f64>,
}
