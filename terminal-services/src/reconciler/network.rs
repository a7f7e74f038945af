use terminal_core::{
    FeeRates, HalvingStatus, MempoolSummary, MiningPool, NetworkSnapshot, TerminalResult,
};
use terminal_mempool::{
    BlockSummary, ChainStats, DifficultyAdjustment, HashrateResponse, MempoolStats, PoolEntry,
    PoolsResponse, RecommendedFees,
};
use tracing::{debug, warn};

/// Pools shown individually before the rest are folded together
const TOP_POOLS: usize = 7;

/// Block time reported when the difficulty epoch has no average yet
const DEFAULT_BLOCK_TIME_MIN: f64 = 10.0;

/// One result per network sub-fetch
#[derive(Debug)]
pub struct NetworkInputs {
    pub fees: TerminalResult<RecommendedFees>,
    pub blocks: TerminalResult<Vec<BlockSummary>>,
    pub difficulty: TerminalResult<DifficultyAdjustment>,
    pub hashrate: TerminalResult<HashrateResponse>,
    pub mempool: TerminalResult<MempoolStats>,
    pub pools: TerminalResult<PoolsResponse>,
    /// Secondary source, only consulted for difficulty
    pub chain_stats: TerminalResult<ChainStats>,
}

impl NetworkInputs {
    /// True when none of the mempool.space endpoints answered
    pub fn mempool_all_failed(&self) -> bool {
        self.fees.is_err()
            && self.blocks.is_err()
            && self.difficulty.is_err()
            && self.hashrate.is_err()
            && self.mempool.is_err()
            && self.pools.is_err()
    }
}

/// Reconciled network view plus whether it is the static placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkReport {
    pub snapshot: NetworkSnapshot,
    pub placeholder: bool,
}

fn ok_or_default<T: Default>(name: &str, result: TerminalResult<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!("Network source {} failed: {}", name, e);
        T::default()
    })
}

/// Merge the network sub-fetches into a snapshot
///
/// Each source is optional and contributes zeros when absent. Only when
/// every mempool.space call failed is the placeholder returned instead.
pub fn reconcile_network(inputs: NetworkInputs) -> NetworkReport {
    if inputs.mempool_all_failed() {
        warn!("All mempool.space requests failed, serving placeholder network stats");
        return NetworkReport {
            snapshot: NetworkSnapshot::placeholder(),
            placeholder: true,
        };
    }

    let NetworkInputs {
        fees,
        blocks,
        difficulty,
        hashrate,
        mempool,
        pools,
        chain_stats,
    } = inputs;

    let fees = ok_or_default("fees", fees);
    let blocks = ok_or_default("blocks", blocks);
    let adjustment = ok_or_default("difficulty-adjustment", difficulty);
    let hashrate = ok_or_default("hashrate", hashrate);
    let mempool = ok_or_default("mempool", mempool);
    let pools = ok_or_default("pools", pools);

    let tip = blocks.first();
    let height = tip.map(|b| b.height).unwrap_or(0);

    // blockchain.info first, then the tip header
    let secondary = match chain_stats {
        Ok(stats) => stats.difficulty,
        Err(e) => {
            debug!("blockchain.info stats unavailable: {}", e);
            None
        }
    };
    let difficulty_raw = secondary
        .filter(|d| *d > 0.0)
        .or_else(|| tip.and_then(|b| b.difficulty))
        .unwrap_or(0.0);

    let window_blocks = pools.block_count.unwrap_or(0);

    let snapshot = NetworkSnapshot {
        height,
        hashrate_eh: hashrate.current_hashrate.unwrap_or(0.0) / 1e18,
        difficulty_t: difficulty_raw / 1e12,
        next_retarget_blocks: adjustment.remaining_blocks.unwrap_or(0),
        difficulty_change_pct: adjustment.difficulty_change.unwrap_or(0.0),
        avg_block_time_min: adjustment
            .time_avg
            .filter(|t| *t > 0.0)
            .map(|t| t / 60_000.0)
            .unwrap_or(DEFAULT_BLOCK_TIME_MIN),
        fees: FeeRates {
            fast: fees.fastest_fee.unwrap_or(0.0),
            hour: fees.hour_fee.unwrap_or(0.0),
        },
        mempool: MempoolSummary {
            count: mempool.count.unwrap_or(0),
            vbytes: mempool.vsize.unwrap_or(0),
        },
        halving: HalvingStatus::from_height(height),
        pools: collapse_pools(pools.pools, window_blocks),
    };

    NetworkReport {
        snapshot,
        placeholder: false,
    }
}

/// Rank pools by blocks found and fold everything past the top seven
///
/// Shares are relative to `window_blocks`, with an empty window counted
/// as one block. The sort is stable so ties keep provider order.
pub fn collapse_pools(entries: Vec<PoolEntry>, window_blocks: u64) -> Vec<MiningPool> {
    let total = window_blocks.max(1) as f64;
    let share = |count: u64| count as f64 / total * 100.0;

    let mut pools: Vec<MiningPool> = entries
        .into_iter()
        .map(|p| MiningPool {
            share_pct: share(p.block_count),
            name: p.name,
            block_count: p.block_count,
            slug: p.slug,
        })
        .collect();

    pools.sort_by(|a, b| b.block_count.cmp(&a.block_count));

    if pools.len() > TOP_POOLS {
        let others: u64 = pools.drain(TOP_POOLS..).map(|p| p.block_count).sum();
        pools.push(MiningPool {
            name: "Unknown / Other".to_string(),
            block_count: others,
            share_pct: share(others),
            slug: "other".to_string(),
        });
    }

    pools
}
