//! Bitcoin network statistics

use serde::{Deserialize, Serialize};

/// Blocks between reward halvings
pub const HALVING_INTERVAL: u64 = 210_000;

/// Height of the next scheduled halving
pub const NEXT_HALVING_HEIGHT: u64 = 1_050_000;

/// Recommended fee rates in sat/vB
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeRates {
    pub fast: f64,
    pub hour: f64,
}

/// Mempool backlog summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MempoolSummary {
    /// Unconfirmed transaction count
    pub count: u64,
    /// Total virtual size of the backlog
    pub vbytes: u64,
}

/// Progress towards the next halving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalvingStatus {
    pub next_block: u64,
    pub blocks_to_go: u64,
    pub progress_pct: f64,
}

impl HalvingStatus {
    /// Compute halving progress from the current tip height
    ///
    /// A height of zero means the tip is unknown; progress is then reported as 0.
    pub fn from_height(height: u64) -> Self {
        let blocks_to_go = NEXT_HALVING_HEIGHT.saturating_sub(height);
        let progress_pct = if height > 0 {
            (HALVING_INTERVAL as f64 - blocks_to_go as f64) / HALVING_INTERVAL as f64 * 100.0
        } else {
            0.0
        };

        Self {
            next_block: NEXT_HALVING_HEIGHT,
            blocks_to_go,
            progress_pct,
        }
    }

    /// Invert `progress_pct` back into a block count
    pub fn blocks_to_go_from_progress(progress_pct: f64) -> f64 {
        HALVING_INTERVAL as f64 - progress_pct / 100.0 * HALVING_INTERVAL as f64
    }
}

/// One mining pool's share of recently found blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningPool {
    pub name: String,
    pub block_count: u64,
    pub share_pct: f64,
    pub slug: String,
}

/// Network view, refreshed independently of market data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Tip height
    pub height: u64,
    /// Hashrate in EH/s
    pub hashrate_eh: f64,
    /// Difficulty in trillions
    pub difficulty_t: f64,
    /// Blocks remaining until the next retarget
    pub next_retarget_blocks: u64,
    /// Estimated change at the next retarget, in percent
    pub difficulty_change_pct: f64,
    /// Average block interval in minutes
    pub avg_block_time_min: f64,
    pub fees: FeeRates,
    pub mempool: MempoolSummary,
    pub halving: HalvingStatus,
    /// Top pools by block count, remainder folded into one entry
    pub pools: Vec<MiningPool>,
}

impl NetworkSnapshot {
    /// Static stand-in served when every network source is down
    pub fn placeholder() -> Self {
        Self {
            height: 840_000,
            hashrate_eh: 650.0,
            difficulty_t: 86.4,
            next_retarget_blocks: 1024,
            difficulty_change_pct: 2.5,
            avg_block_time_min: 9.8,
            fees: FeeRates {
                fast: 12.0,
                hour: 8.0,
            },
            mempool: MempoolSummary {
                count: 1500,
                vbytes: 5_000_000,
            },
            halving: HalvingStatus {
                next_block: NEXT_HALVING_HEIGHT,
                blocks_to_go: 200_000,
                progress_pct: 5.5,
            },
            pools: Vec::new(),
        }
    }
}
