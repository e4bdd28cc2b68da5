// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Blocknative gas price API provider
//!
//! The `blockprices` response is passed through unchanged, tagged with
//! `source: "blocknative"`.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::constants::endpoints;
use crate::errors::ProviderError;
use crate::fees::FeeSnapshot;
use crate::network::Network;

use super::{CredentialCheck, GasProvider, ProviderName};

const INVALID_KEY: &str = "Blocknative API key is invalid";

/// Marker in the error message Blocknative returns for a rejected key
const AUTH_REJECTED_MARKER: &str = "Authorization header must";

const NETWORKS: [Network; 2] = [Network::Ethereum, Network::Polygon];

#[derive(Clone)]
pub struct BlocknativeProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for BlocknativeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlocknativeProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BlocknativeProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, endpoints::BLOCKNATIVE_BLOCKPRICES)
    }

    /// Point the provider at a different `blockprices` URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, network: Network) -> Result<String, ProviderError> {
        match network {
            Network::Ethereum => Ok(self.base_url.clone()),
            Network::Polygon => Ok(format!("{}?chainid={}", self.base_url, network.chain_id())),
            other => Err(ProviderError::UnsupportedNetwork {
                provider: ProviderName::Blocknative,
                network: other,
            }),
        }
    }

    /// Fetch the raw response body along with whether the status was a success.
    async fn fetch_body(&self, network: Network) -> Result<(bool, Value), ProviderError> {
        let http = |source: reqwest::Error| ProviderError::Http {
            provider: ProviderName::Blocknative,
            source,
        };

        let response = self
            .client
            .get(self.url_for(network)?)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(http)?;
        let success = response.status().is_success();
        let body = response.json::<Value>().await.map_err(http)?;
        Ok((success, body))
    }
}

fn is_auth_rejection(body: &Value) -> bool {
    body.get("msg")
        .and_then(Value::as_str)
        .is_some_and(|msg| msg.contains(AUTH_REJECTED_MARKER))
}

#[async_trait]
impl GasProvider for BlocknativeProvider {
    fn name(&self) -> ProviderName {
        ProviderName::Blocknative
    }

    fn supported_networks(&self) -> &[Network] {
        &NETWORKS
    }

    async fn fetch_fee(&self, network: Network) -> Result<FeeSnapshot, ProviderError> {
        let (success, body) = self.fetch_body(network).await?;
        if !success || is_auth_rejection(&body) {
            return Err(ProviderError::invalid_response(
                ProviderName::Blocknative,
                format!("request rejected: {body}"),
            ));
        }
        debug!(network = %network, "Fetched Blocknative block prices");
        FeeSnapshot::from_json(ProviderName::Blocknative, body)
    }

    async fn check_credentials(&self) -> CredentialCheck {
        match self.fetch_body(Network::Polygon).await {
            Ok((_, body)) if is_auth_rejection(&body) => {
                CredentialCheck::Invalid(INVALID_KEY.to_string())
            }
            Ok(_) => CredentialCheck::Valid,
            Err(e) => {
                debug!(error = %e, "Blocknative credential probe failed");
                CredentialCheck::Invalid(INVALID_KEY.to_string())
            }
        }
    }
}
