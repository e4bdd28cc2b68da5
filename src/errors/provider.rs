//! Error types for upstream gas fee providers.
//!
//! Provider errors never escape a network aggregation: the aggregator logs
//! them and drops the failing provider's contribution.

use std::time::Duration;

use crate::network::Network;
use crate::providers::ProviderName;

/// Errors that can occur while fetching a fee snapshot from one provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider did not answer before its deadline.
    #[error("{provider} timed out after {timeout:?} fetching {network} fees")]
    Timeout {
        provider: ProviderName,
        network: Network,
        timeout: Duration,
    },

    /// The provider has no endpoint for the requested network.
    #[error("{provider} does not support {network}")]
    UnsupportedNetwork {
        provider: ProviderName,
        network: Network,
    },

    /// A JSON-RPC call failed.
    #[error("Error in {provider} during {operation}")]
    Rpc {
        provider: ProviderName,
        /// RPC method or operation that failed (e.g. `eth_feeHistory`)
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A REST call failed at the HTTP layer.
    #[error("Error in {provider}: HTTP request failed")]
    Http {
        provider: ProviderName,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with data we cannot use.
    #[error("Error in {provider}: invalid response: {details}")]
    InvalidResponse {
        provider: ProviderName,
        details: String,
    },

    /// The configured endpoint URL could not be parsed.
    #[error("Invalid provider endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ProviderError {
    /// Helper to create an `Rpc` error from any error type.
    pub fn rpc(
        provider: ProviderName,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProviderError::Rpc {
            provider,
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create an `InvalidResponse` error.
    pub fn invalid_response(provider: ProviderName, details: impl Into<String>) -> Self {
        ProviderError::InvalidResponse {
            provider,
            details: details.into(),
        }
    }

    /// Returns true if the error is a deadline expiry rather than a failure.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }
}
