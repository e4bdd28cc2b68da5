// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Upstream gas fee providers
//!
//! Every upstream source implements [`GasProvider`]: a set of supported
//! networks, a lazy per-network fee fetch, and a credential probe. Networks a
//! provider does not cover are simply absent from
//! [`GasProvider::supported_networks`]; the aggregator never asks for them.
//!
//! # Built-in providers
//!
//! | Provider | Transport | Credentials |
//! |----------|-----------|-------------|
//! | [`BlocknativeProvider`] | REST gas price API | API key header |
//! | [`AlchemyProvider`] | JSON-RPC (`eth_gasPrice`, `eth_maxPriorityFeePerGas`) | API key in URL |
//! | [`FeeHistoryProvider::ankr`] | JSON-RPC `eth_feeHistory` | none |
//! | [`FeeHistoryProvider::llama`] | JSON-RPC `eth_feeHistory` | none |
//!
//! # Example: Implementing a provider
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use gasfeed::{CredentialCheck, FeeSnapshot, GasProvider, Network, ProviderError, ProviderName};
//!
//! struct FixedFees;
//!
//! #[async_trait]
//! impl GasProvider for FixedFees {
//!     fn name(&self) -> ProviderName {
//!         ProviderName::Llama
//!     }
//!
//!     fn supported_networks(&self) -> &[Network] {
//!         &[Network::Ethereum]
//!     }
//!
//!     async fn fetch_fee(&self, _network: Network) -> Result<FeeSnapshot, ProviderError> {
//!         FeeSnapshot::from_json(self.name(), serde_json::json!({ "gasPrice": 1 }))
//!     }
//!
//!     async fn check_credentials(&self) -> CredentialCheck {
//!         CredentialCheck::Valid
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::SourceConfig;
use crate::errors::ProviderError;
use crate::fees::FeeSnapshot;
use crate::network::Network;

mod alchemy;
mod blocknative;
mod factory;
mod fee_history;

pub use alchemy::AlchemyProvider;
pub use blocknative::BlocknativeProvider;
pub use factory::{connect_http, FeeRpcProvider, RpcEndpoint};
pub use fee_history::FeeHistoryProvider;

/// Identifier of an upstream gas fee source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    Blocknative,
    Alchemy,
    Ankr,
    Llama,
}

impl ProviderName {
    /// Lowercase identifier, as it appears in snapshots.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocknative => "blocknative",
            Self::Alchemy => "alchemy",
            Self::Ankr => "ankr",
            Self::Llama => "llama",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a provider's credential probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    Valid,
    /// The probe failed; carries a human-readable reason.
    Invalid(String),
}

impl CredentialCheck {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Capability contract for an upstream gas fee provider.
///
/// Implementations must be cheap to call concurrently: the aggregator invokes
/// `fetch_fee` for one network on every supporting provider at once, and the
/// connection checker runs every `check_credentials` at once.
#[async_trait]
pub trait GasProvider: Send + Sync {
    /// Name recorded as the `source` of every snapshot.
    fn name(&self) -> ProviderName;

    /// Networks this provider has an endpoint for.
    fn supported_networks(&self) -> &[Network];

    /// Whether `network` is covered by this provider.
    fn supports(&self, network: Network) -> bool {
        self.supported_networks().contains(&network)
    }

    /// Fetch a fee snapshot for one network.
    ///
    /// Returns [`ProviderError::UnsupportedNetwork`] for networks outside
    /// [`supported_networks`](GasProvider::supported_networks).
    async fn fetch_fee(&self, network: Network) -> Result<FeeSnapshot, ProviderError>;

    /// Probe whether the configured credentials are accepted.
    async fn check_credentials(&self) -> CredentialCheck;
}

/// The standard provider set for a source configuration.
pub fn default_providers(config: &SourceConfig) -> Vec<Arc<dyn GasProvider>> {
    vec![
        Arc::new(BlocknativeProvider::new(config.block_native_api_key.clone())),
        Arc::new(AlchemyProvider::new(config.alchemy_api_key.clone())),
        Arc::new(FeeHistoryProvider::ankr()),
        Arc::new(FeeHistoryProvider::llama()),
    ]
}
