// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC client construction for RPC-backed providers

use alloy_network::Ethereum;
use alloy_provider::RootProvider;
use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use tower::Layer;

use crate::errors::ProviderError;
use crate::network::Network;
use crate::transport::RpcLoggingLayer;

use super::ProviderName;

/// HTTP provider type used by every RPC-backed gas provider
pub type FeeRpcProvider = RootProvider<Ethereum>;

/// A JSON-RPC endpoint serving one network for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    pub provider: ProviderName,
    pub network: Network,
    pub url: String,
}

impl RpcEndpoint {
    pub fn new(provider: ProviderName, network: Network, url: impl Into<String>) -> Self {
        Self {
            provider,
            network,
            url: url.into(),
        }
    }
}

/// Create a read-only HTTP provider for an endpoint, with RPC call logging.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidEndpoint`] if the URL cannot be parsed.
pub fn connect_http(endpoint: &RpcEndpoint) -> Result<FeeRpcProvider, ProviderError> {
    let url: url::Url = endpoint
        .url
        .parse()
        .map_err(|e| ProviderError::InvalidEndpoint(format!("{}: {e}", endpoint.provider)))?;

    let http = Http::new(url);
    let transport = RpcLoggingLayer::new(endpoint.provider, endpoint.network).layer(http);
    let client = RpcClient::new(transport, false);
    Ok(RootProvider::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_http_rejects_malformed_url() {
        let endpoint = RpcEndpoint::new(ProviderName::Ankr, Network::Polygon, "not a url");
        let err = connect_http(&endpoint).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidEndpoint(_)));
        assert!(err.to_string().contains("ankr"));
    }

    #[test]
    fn test_connect_http_accepts_https_url() {
        let endpoint = RpcEndpoint::new(
            ProviderName::Llama,
            Network::Ethereum,
            "https://eth.llamarpc.com",
        );
        assert!(connect_http(&endpoint).is_ok());
    }
}
