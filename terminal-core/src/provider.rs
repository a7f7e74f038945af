//! Upstream data providers

use serde::{Deserialize, Serialize};
use std::fmt;

/// External services the terminal pulls data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Kraken - exchange ticker and OHLC candles
    Kraken,
    /// CoinGecko - global market metadata and history
    CoinGecko,
    /// mempool.space - fees, blocks, hashrate, mining pools
    Mempool,
    /// blockchain.info - chain stats, used for difficulty
    BlockchainInfo,
    /// Google Gemini - sentiment summaries
    Gemini,
}

impl Provider {
    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Kraken => "Kraken",
            Provider::CoinGecko => "CoinGecko",
            Provider::Mempool => "mempool.space",
            Provider::BlockchainInfo => "blockchain.info",
            Provider::Gemini => "Gemini",
        }
    }

    /// Whether calls to this provider need a credential
    pub fn requires_credential(&self) -> bool {
        matches!(self, Provider::Gemini)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
