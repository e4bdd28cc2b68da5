// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-network fan-out over every provider that supports the network
//!
//! All supporting providers are queried at once, each under its own deadline.
//! A provider that errors or runs out of time only loses its own
//! contribution; the aggregate is built from whatever completed, in
//! completion order.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tracing::{debug, warn, Instrument};

use crate::config::constants::DEFAULT_FETCH_TIMEOUT;
use crate::errors::ProviderError;
use crate::fees::FeeSnapshot;
use crate::network::Network;
use crate::providers::GasProvider;
use crate::spans;

/// Snapshots gathered for one network in one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRecord {
    pub network: Network,
    /// Successful snapshots in the order their providers completed
    pub snapshots: Vec<FeeSnapshot>,
}

/// Queries every supporting provider for a network and collects the results.
#[derive(Clone)]
pub struct NetworkAggregator {
    providers: Vec<Arc<dyn GasProvider>>,
    timeout: Duration,
}

impl NetworkAggregator {
    pub fn new(providers: Vec<Arc<dyn GasProvider>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Override the per-provider deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Aggregate fees for `network`.
    ///
    /// Settles once every supporting provider has answered, failed or timed
    /// out. Returns `None` when no provider succeeded.
    pub async fn aggregate(&self, network: Network) -> Option<AggregatedRecord> {
        let supporting: Vec<&Arc<dyn GasProvider>> = self
            .providers
            .iter()
            .filter(|provider| provider.supports(network))
            .collect();

        let span = spans::aggregate_network(network, supporting.len(), self.timeout);
        async move {
            let mut pending: FuturesUnordered<_> = supporting
                .into_iter()
                .map(|provider| self.fetch_with_deadline(&**provider, network))
                .collect();

            let mut snapshots = Vec::new();
            while let Some(result) = pending.next().await {
                match result {
                    Ok(snapshot) => {
                        debug!(provider = %snapshot.source(), "Provider contributed a snapshot");
                        snapshots.push(snapshot);
                    }
                    Err(e) if e.is_timeout() => warn!(error = %e, "Provider timed out"),
                    Err(e) => warn!(error = %e, "Provider failed, excluding its snapshot"),
                }
            }

            if snapshots.is_empty() {
                warn!("No provider returned fees");
                return None;
            }
            debug!(snapshots = snapshots.len(), "Aggregated network fees");
            Some(AggregatedRecord { network, snapshots })
        }
        .instrument(span)
        .await
    }

    async fn fetch_with_deadline(
        &self,
        provider: &dyn GasProvider,
        network: Network,
    ) -> Result<FeeSnapshot, ProviderError> {
        let name = provider.name();
        match tokio::time::timeout(self.timeout, provider.fetch_fee(network))
            .instrument(spans::fetch_fee(name, network))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: name,
                network,
                timeout: self.timeout,
            }),
        }
    }
}

impl std::fmt::Debug for NetworkAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("NetworkAggregator")
            .field("providers", &names)
            .field("timeout", &self.timeout)
            .finish()
    }
}
