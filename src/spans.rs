// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for gasfeed operations.
//!
//! Telemetry is kept out of the business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, network: Network) -> Result<T> {
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(network))
//!     .await
//! }
//! ```
//!
//! Async code attaches spans with `Instrument` rather than holding an
//! entered guard across `.await` points.

use std::time::Duration;

use tracing::{Level, Span};

use crate::config::{InvalidRecordStrategy, NamingStrategy};
use crate::network::Network;
use crate::providers::ProviderName;

/// Create span for aggregating fees from every provider for one network.
///
/// Parent: source_read span
/// Children: fetch_fee spans (one per supporting provider)
#[inline]
pub(crate) fn aggregate_network(network: Network, providers: usize, timeout: Duration) -> Span {
    let span = tracing::info_span!(
        "gasfeed.aggregate_network",
        network = %network,
        chain_id = tracing::field::Empty,
        providers = providers,
        timeout_ms = timeout.as_millis() as u64,
    );
    if let Some(chain) = network.named_chain() {
        span.record("chain_id", tracing::field::display(chain));
    }
    span
}

/// Create span for a single provider fetch.
///
/// Parent: aggregate_network span
/// Children: gasfeed.rpc_call spans for RPC-backed providers
#[inline]
pub(crate) fn fetch_fee(provider: ProviderName, network: Network) -> Span {
    tracing::debug_span!("gasfeed.fetch_fee", provider = %provider, network = %network)
}

/// Create span for a full source read across networks.
///
/// Parent: None (root span for this operation)
/// Children: aggregate_network spans
#[inline]
pub(crate) fn source_read(networks: usize) -> Span {
    tracing::span!(Level::INFO, "gasfeed.source_read", networks = networks)
}

/// Create span for the provider credential check.
///
/// Parent: None (root span for this operation)
#[inline]
pub(crate) fn check_credentials(providers: usize) -> Span {
    tracing::info_span!("gasfeed.check_credentials", providers = providers)
}

/// Create span for resolving logical streams to output channels.
///
/// Parent: write_session span
#[inline]
pub(crate) fn resolve_streams(streams: usize, naming: NamingStrategy) -> Span {
    tracing::info_span!(
        "gasfeed.resolve_streams",
        streams = streams,
        naming = ?naming,
    )
}

/// Create span for one destination write session.
///
/// Parent: None (root span for this operation)
/// Children: resolve_streams span, publish_record spans
#[inline]
pub(crate) fn write_session(dry_run: bool, invalid_records: InvalidRecordStrategy) -> Span {
    tracing::span!(
        Level::INFO,
        "gasfeed.write_session",
        dry_run = dry_run,
        invalid_records = ?invalid_records,
    )
}

/// Create span for one spawned publish task.
///
/// Parent: write_session span
#[inline]
pub(crate) fn publish_record(stream: &str, channel: &str) -> Span {
    tracing::debug_span!("gasfeed.publish_record", stream = %stream, channel = %channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_network_span_carries_chain() {
        let subscriber = tracing_subscriber::fmt().with_max_level(Level::INFO).finish();
        tracing::subscriber::with_default(subscriber, || {
            let span = aggregate_network(Network::Polygon, 3, Duration::from_secs(1));
            assert!(!span.is_disabled());
            assert!(span.has_field("chain_id"));
            assert!(span.has_field("network"));
        });
    }
}
