// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Channel-publishing destination
//!
//! A write session has three phases:
//!
//! 1. **Open**: verify the publish transport and resolve every logical stream
//!    in the catalog to a channel ([`StreamResolver`]).
//! 2. **Write**: route and publish records, buffering states
//!    ([`WriteCoordinator`]).
//! 3. **Drain**: wait for outstanding publishes, then release states.
//!
//! # Example
//!
//! ```rust,ignore
//! use gasfeed::{ConfiguredCatalog, Destination, DestinationConfig};
//!
//! let config = DestinationConfig::from_path("destination.json")?;
//! let catalog = ConfiguredCatalog::from_path("catalog.json")?;
//! let destination = Destination::from_config(config)?;
//!
//! let coordinator = destination.open(&catalog, false).await?;
//! let outcome = coordinator.write(tokio::io::BufReader::new(tokio::io::stdin())).await?;
//! ```

use std::sync::Arc;

use tracing::info;

use crate::config::DestinationConfig;
use crate::errors::ConfigurationError;
use crate::protocol::{ConfiguredCatalog, ConnectionStatus};

mod publisher;
mod resolver;
mod router;
mod stats;
mod writer;

pub use publisher::{ChannelHandle, ChannelPublisher, HttpPublisher};
pub use resolver::{StreamBinding, StreamResolver};
pub use router::{RecordRouter, Route};
pub use stats::WriteStats;
pub use writer::{state_lines, WriteAborted, WriteCoordinator, WriteOutcome};

/// A configured destination bound to a publish transport.
pub struct Destination {
    config: DestinationConfig,
    publisher: Arc<dyn ChannelPublisher>,
}

impl Destination {
    /// Destination publishing through the configured HTTP gateway.
    pub fn from_config(config: DestinationConfig) -> Result<Self, ConfigurationError> {
        let endpoint = config.endpoint()?;
        if config.network_endpoint_override.is_some() {
            info!(endpoint = %endpoint, "Using publish endpoint override");
        }
        let publisher = HttpPublisher::new(endpoint, config.credential.clone())
            .map_err(|source| ConfigurationError::PublisherUnavailable { source })?;
        Ok(Self::with_publisher(config, Arc::new(publisher)))
    }

    /// Destination over any publish transport.
    pub fn with_publisher(config: DestinationConfig, publisher: Arc<dyn ChannelPublisher>) -> Self {
        Self { config, publisher }
    }

    #[must_use]
    pub fn config(&self) -> &DestinationConfig {
        &self.config
    }

    /// Verify the publish transport accepts the credential.
    pub async fn check(&self) -> ConnectionStatus {
        ConnectionStatus::from_result(self.verify().await)
    }

    async fn verify(&self) -> Result<(), ConfigurationError> {
        self.publisher
            .verify()
            .await
            .map_err(|source| ConfigurationError::PublisherUnavailable { source })
    }

    /// Start a write session for `catalog`.
    ///
    /// `dry_run` forces a dry run regardless of configuration.
    pub async fn open(
        &self,
        catalog: &ConfiguredCatalog,
        dry_run: bool,
    ) -> Result<WriteCoordinator, ConfigurationError> {
        self.verify().await?;

        let naming = self.config.stream_name_behavior;
        let binding = StreamResolver::new(
            self.publisher.as_ref(),
            &self.config.stream_name_prefix,
            naming,
        )
        .resolve(&catalog.stream_names())
        .await?;

        Ok(WriteCoordinator::new(
            Arc::clone(&self.publisher),
            RecordRouter::new(binding, naming),
            self.config.invalid_record_strategy,
            dry_run || self.config.dry_run,
        ))
    }
}
