//! Well-known endpoints and tuning constants
//!
//! Timeouts, fee history parameters and upstream URLs used across the crate.

use std::time::Duration;

/// Deadline applied to every provider fetch.
///
/// A provider that has not answered by then is dropped from the current
/// network's aggregate; its siblings are unaffected.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fee history parameters for RPC-based fee estimation
pub mod fee_history {
    /// Number of blocks in the fee history window
    pub const BLOCK_COUNT: u64 = 20;

    /// Reward percentiles requested for the safeLow/standard/fast/rapid tiers
    pub const REWARD_PERCENTILES: [f64; 4] = [10.0, 25.0, 60.0, 85.0];
}

/// Upstream provider endpoints
pub mod endpoints {
    /// Blocknative block prices API (Ethereum by default, `?chainid=` for others)
    pub const BLOCKNATIVE_BLOCKPRICES: &str = "https://api.blocknative.com/gasprices/blockprices";

    /// Ankr public RPC base URL; the network name is appended
    pub const ANKR_RPC_BASE: &str = "https://rpc.ankr.com/";

    /// Alchemy RPC URL template host suffix
    pub const ALCHEMY_HOST_SUFFIX: &str = "g.alchemy.com/v2/";

    /// Publish gateway used when no endpoint override is configured
    pub const DEFAULT_PUBLISH_GATEWAY: &str = "http://localhost:7171";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_timeout_is_thirty_seconds() {
        assert_eq!(DEFAULT_FETCH_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_percentiles_are_ascending() {
        let p = fee_history::REWARD_PERCENTILES;
        assert!(p.windows(2).all(|w| w[0] < w[1]));
    }
}
