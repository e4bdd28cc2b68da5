// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Networks whose gas fees are aggregated.
//!
//! The set is closed: every network has a fixed chain id and a logical stream
//! name (`gas-station/<network>`) under which its aggregated record is emitted.

use std::fmt;
use std::str::FromStr;

use alloy_chains::NamedChain;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// Prefix shared by every logical stream the source emits.
pub const STREAM_NAME_PREFIX: &str = "gas-station/";

/// A blockchain network with gas fee coverage from at least one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Polygon,
    Arbitrum,
    Optimism,
    Astar,
    Base,
    Bsc,
    Fantom,
    Avalanche,
}

impl Network {
    /// Every known network, in declaration order.
    pub const ALL: [Network; 9] = [
        Network::Ethereum,
        Network::Polygon,
        Network::Arbitrum,
        Network::Optimism,
        Network::Astar,
        Network::Base,
        Network::Bsc,
        Network::Fantom,
        Network::Avalanche,
    ];

    /// Lowercase identifier used in configuration and stream names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Polygon => "polygon",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Astar => "astar",
            Self::Base => "base",
            Self::Bsc => "bsc",
            Self::Fantom => "fantom",
            Self::Avalanche => "avalanche",
        }
    }

    /// EIP-155 chain id of the network's mainnet.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Polygon => 137,
            Self::Arbitrum => 42161,
            Self::Optimism => 10,
            Self::Astar => 592,
            Self::Base => 8453,
            Self::Bsc => 56,
            Self::Fantom => 250,
            Self::Avalanche => 43114,
        }
    }

    /// The alloy chain for this network, if alloy knows it.
    #[must_use]
    pub fn named_chain(&self) -> Option<NamedChain> {
        NamedChain::try_from(self.chain_id()).ok()
    }

    /// Logical stream name, e.g. `gas-station/polygon`.
    #[must_use]
    pub fn stream_name(&self) -> String {
        format!("{STREAM_NAME_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|network| network.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigurationError::invalid_config(format!("unknown network '{s}'")))
    }
}
