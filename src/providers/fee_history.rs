// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Providers that estimate fee tiers from public `eth_feeHistory` endpoints
//!
//! Ankr and LlamaRPC expose plain JSON-RPC nodes with no gas API and no
//! credentials. Fee tiers are derived from the reward percentiles of the last
//! blocks, see [`fee_options_from_history`].

use alloy_eips::BlockNumberOrTag;
use alloy_provider::Provider;
use async_trait::async_trait;
use tracing::debug;

use crate::config::constants::{endpoints, fee_history};
use crate::errors::ProviderError;
use crate::fees::{fee_options_from_history, FeeSnapshot};
use crate::network::Network;

use super::factory::{connect_http, RpcEndpoint};
use super::{CredentialCheck, GasProvider, ProviderName};

const ANKR_NETWORKS: [Network; 7] = [
    Network::Optimism,
    Network::Polygon,
    Network::Ethereum,
    Network::Bsc,
    Network::Fantom,
    Network::Arbitrum,
    Network::Avalanche,
];

const LLAMA_ENDPOINTS: [(Network, &str); 6] = [
    (Network::Arbitrum, "https://arbitrum.llamarpc.com"),
    (Network::Base, "https://base.llamarpc.com"),
    (Network::Bsc, "https://binance.llamarpc.com"),
    (Network::Ethereum, "https://eth.llamarpc.com"),
    (Network::Optimism, "https://optimism.llamarpc.com"),
    (Network::Polygon, "https://polygon.llamarpc.com"),
];

/// A credential-free provider backed by one RPC endpoint per network.
#[derive(Debug, Clone)]
pub struct FeeHistoryProvider {
    name: ProviderName,
    networks: Vec<Network>,
    endpoints: Vec<RpcEndpoint>,
}

impl FeeHistoryProvider {
    /// Build a provider from an explicit endpoint table.
    pub fn new(name: ProviderName, endpoints: impl IntoIterator<Item = (Network, String)>) -> Self {
        let endpoints: Vec<RpcEndpoint> = endpoints
            .into_iter()
            .map(|(network, url)| RpcEndpoint::new(name, network, url))
            .collect();
        Self {
            name,
            networks: endpoints.iter().map(|e| e.network).collect(),
            endpoints,
        }
    }

    /// Ankr public RPC (`https://rpc.ankr.com/<network>`).
    pub fn ankr() -> Self {
        Self::new(
            ProviderName::Ankr,
            ANKR_NETWORKS
                .iter()
                .map(|network| (*network, format!("{}{network}", endpoints::ANKR_RPC_BASE))),
        )
    }

    /// LlamaRPC public endpoints.
    pub fn llama() -> Self {
        Self::new(
            ProviderName::Llama,
            LLAMA_ENDPOINTS
                .iter()
                .map(|(network, url)| (*network, (*url).to_string())),
        )
    }

    fn endpoint(&self, network: Network) -> Result<&RpcEndpoint, ProviderError> {
        self.endpoints
            .iter()
            .find(|e| e.network == network)
            .ok_or(ProviderError::UnsupportedNetwork {
                provider: self.name,
                network,
            })
    }
}

#[async_trait]
impl GasProvider for FeeHistoryProvider {
    fn name(&self) -> ProviderName {
        self.name
    }

    fn supported_networks(&self) -> &[Network] {
        &self.networks
    }

    async fn fetch_fee(&self, network: Network) -> Result<FeeSnapshot, ProviderError> {
        let endpoint = self.endpoint(network)?;
        let provider = connect_http(endpoint)?;

        let history = provider
            .get_fee_history(
                fee_history::BLOCK_COUNT,
                BlockNumberOrTag::Pending,
                &fee_history::REWARD_PERCENTILES,
            )
            .await
            .map_err(|e| ProviderError::rpc(self.name, "eth_feeHistory", e))?;

        let rewards = history.reward.as_deref().unwrap_or_default();
        let options =
            fee_options_from_history(history.oldest_block, &history.base_fee_per_gas, rewards)
                .map_err(|e| ProviderError::invalid_response(self.name, e.to_string()))?;

        debug!(
            provider = %self.name,
            network = %network,
            block_number = options.block_number,
            estimated_base_fee = %options.estimated_base_fee,
            "Estimated fee tiers from fee history"
        );

        FeeSnapshot::new(self.name, &options)
    }

    async fn check_credentials(&self) -> CredentialCheck {
        // public endpoints, nothing to validate
        CredentialCheck::Valid
    }
}
