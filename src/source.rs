// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The gas fee source: one record per network with at least one snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use gasfeed::{SourceConfig, SourceEmitter};
//!
//! let config = SourceConfig::from_path("source.json")?;
//! let emitter = SourceEmitter::from_config(&config);
//!
//! for message in emitter.read().await? {
//!     println!("{}", message.to_line()?);
//! }
//! ```

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, Instrument};

use crate::aggregator::{AggregatedRecord, NetworkAggregator};
use crate::config::SourceConfig;
use crate::fees::FeeSnapshot;
use crate::network::Network;
use crate::protocol::{Catalog, Message, RecordMessage, StreamDescriptor};
use crate::providers::{default_providers, GasProvider};
use crate::spans;

/// Record emitted for one network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRecord {
    /// Logical stream name, e.g. `gas-station/polygon`
    pub network: String,
    pub data: Vec<FeeSnapshot>,
}

impl From<AggregatedRecord> for SourceRecord {
    fn from(record: AggregatedRecord) -> Self {
        Self {
            network: record.network.stream_name(),
            data: record.snapshots,
        }
    }
}

/// Drives one aggregation per configured network.
#[derive(Debug, Clone)]
pub struct SourceEmitter {
    aggregator: NetworkAggregator,
    networks: Vec<Network>,
}

impl SourceEmitter {
    pub fn new(aggregator: NetworkAggregator, networks: Vec<Network>) -> Self {
        Self {
            aggregator,
            networks,
        }
    }

    /// Emitter over the standard providers for a configuration.
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::with_providers(config, default_providers(config))
    }

    /// Emitter over custom providers, honoring the configured networks and
    /// timeout.
    pub fn with_providers(config: &SourceConfig, providers: Vec<Arc<dyn GasProvider>>) -> Self {
        let aggregator = NetworkAggregator::new(providers).with_timeout(config.fetch_timeout());
        Self::new(aggregator, config.networks())
    }

    #[must_use]
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    /// Catalog of the logical stream of every configured network.
    #[must_use]
    pub fn discover(&self) -> Catalog {
        Catalog {
            streams: self
                .networks
                .iter()
                .map(|network| StreamDescriptor::full_refresh(network.stream_name()))
                .collect(),
        }
    }

    /// Aggregate every configured network concurrently.
    ///
    /// Networks where no provider succeeded produce nothing. Records follow
    /// the configured network order.
    pub async fn emit(&self) -> Vec<SourceRecord> {
        async {
            let aggregates = join_all(
                self.networks
                    .iter()
                    .map(|network| self.aggregator.aggregate(*network)),
            )
            .await;

            let records: Vec<SourceRecord> = aggregates
                .into_iter()
                .flatten()
                .map(SourceRecord::from)
                .collect();
            info!(
                records = records.len(),
                networks = self.networks.len(),
                "Source read complete"
            );
            records
        }
        .instrument(spans::source_read(self.networks.len()))
        .await
    }

    /// Emit every record wrapped in a `RECORD` envelope.
    pub async fn read(&self) -> Result<Vec<Message>, serde_json::Error> {
        let emitted_at = Utc::now().timestamp_millis();
        self.emit()
            .await
            .into_iter()
            .map(|record| {
                Ok(Message::record(RecordMessage {
                    stream: record.network.clone(),
                    data: serde_json::to_value(&record)?,
                    emitted_at: Some(emitted_at),
                }))
            })
            .collect()
    }
}
