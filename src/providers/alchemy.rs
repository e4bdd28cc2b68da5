// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Alchemy JSON-RPC fee data provider

use alloy_eips::BlockNumberOrTag;
use alloy_provider::Provider;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::constants::endpoints;
use crate::errors::ProviderError;
use crate::fees::{FeeData, FeeSnapshot};
use crate::network::Network;

use super::factory::{connect_http, RpcEndpoint};
use super::{CredentialCheck, GasProvider, ProviderName};

const INVALID_KEY: &str = "Alchemy API key is invalid";

/// Alchemy subdomain for every network it serves
const NETWORK_SLUGS: [(Network, &str); 6] = [
    (Network::Ethereum, "eth-mainnet"),
    (Network::Polygon, "polygon-mainnet"),
    (Network::Arbitrum, "arb-mainnet"),
    (Network::Optimism, "opt-mainnet"),
    (Network::Astar, "astar-mainnet"),
    (Network::Base, "base-mainnet"),
];

/// Reports wallet-style [`FeeData`] from Alchemy's node API.
#[derive(Clone)]
pub struct AlchemyProvider {
    networks: Vec<Network>,
    endpoints: Vec<RpcEndpoint>,
}

impl std::fmt::Debug for AlchemyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // endpoint URLs embed the API key
        f.debug_struct("AlchemyProvider")
            .field("networks", &self.networks)
            .finish_non_exhaustive()
    }
}

impl AlchemyProvider {
    pub fn new(api_key: impl AsRef<str>) -> Self {
        let api_key = api_key.as_ref();
        Self::with_endpoints(NETWORK_SLUGS.iter().map(|(network, slug)| {
            (
                *network,
                format!("https://{slug}.{}{api_key}", endpoints::ALCHEMY_HOST_SUFFIX),
            )
        }))
    }

    /// Use explicit per-network endpoint URLs instead of Alchemy's hosts.
    pub fn with_endpoints(endpoints: impl IntoIterator<Item = (Network, String)>) -> Self {
        let endpoints: Vec<RpcEndpoint> = endpoints
            .into_iter()
            .map(|(network, url)| RpcEndpoint::new(ProviderName::Alchemy, network, url))
            .collect();
        Self {
            networks: endpoints.iter().map(|e| e.network).collect(),
            endpoints,
        }
    }

    fn endpoint(&self, network: Network) -> Result<&RpcEndpoint, ProviderError> {
        self.endpoints
            .iter()
            .find(|e| e.network == network)
            .ok_or(ProviderError::UnsupportedNetwork {
                provider: ProviderName::Alchemy,
                network,
            })
    }
}

#[async_trait]
impl GasProvider for AlchemyProvider {
    fn name(&self) -> ProviderName {
        ProviderName::Alchemy
    }

    fn supported_networks(&self) -> &[Network] {
        &self.networks
    }

    async fn fetch_fee(&self, network: Network) -> Result<FeeSnapshot, ProviderError> {
        let provider = connect_http(self.endpoint(network)?)?;
        let name = ProviderName::Alchemy;

        let (gas_price, priority_fee, history) = tokio::try_join!(
            async {
                provider
                    .get_gas_price()
                    .await
                    .map_err(|e| ProviderError::rpc(name, "eth_gasPrice", e))
            },
            async {
                provider
                    .get_max_priority_fee_per_gas()
                    .await
                    .map_err(|e| ProviderError::rpc(name, "eth_maxPriorityFeePerGas", e))
            },
            async {
                provider
                    .get_fee_history(1, BlockNumberOrTag::Latest, &[])
                    .await
                    .map_err(|e| ProviderError::rpc(name, "eth_feeHistory", e))
            },
        )?;

        let last_base_fee = history
            .base_fee_per_gas
            .first()
            .copied()
            .ok_or_else(|| ProviderError::invalid_response(name, "fee history has no base fee"))?;

        let fee_data = FeeData::new(gas_price, last_base_fee, priority_fee);
        debug!(
            provider = %name,
            network = %network,
            max_fee_per_gas = %fee_data.max_fee_per_gas,
            "Fetched fee data"
        );
        FeeSnapshot::new(name, &fee_data)
    }

    async fn check_credentials(&self) -> CredentialCheck {
        let provider = match self.endpoint(Network::Ethereum).and_then(connect_http) {
            Ok(provider) => provider,
            Err(e) => {
                warn!(error = %e, "Alchemy credential probe could not start");
                return CredentialCheck::Invalid(INVALID_KEY.to_string());
            }
        };

        match provider.get_block_number().await {
            Ok(_) => CredentialCheck::Valid,
            Err(e) => {
                debug!(error = %e, "Alchemy credential probe failed");
                CredentialCheck::Invalid(INVALID_KEY.to_string())
            }
        }
    }
}
