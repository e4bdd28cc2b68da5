//! Configuration for the gasfeed source and destination
//!
//! Both halves of the pipeline are configured from JSON documents with
//! camelCase keys. Loading is typed: a document that deserializes is then
//! checked by `validate()` for the constraints serde cannot express.
//!
//! # Example: Source configuration
//!
//! ```rust
//! use gasfeed::{Network, SourceConfigBuilder};
//! use std::time::Duration;
//!
//! let config = SourceConfigBuilder::new("bn-key", "alchemy-key")
//!     .networks([Network::Ethereum, Network::Polygon])
//!     .fetch_timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert_eq!(config.networks(), vec![Network::Ethereum, Network::Polygon]);
//! ```
//!
//! # Example: Destination configuration
//!
//! ```rust
//! use gasfeed::{DestinationConfig, InvalidRecordStrategy, NamingStrategy};
//!
//! let config: DestinationConfig = serde_json::from_str(r#"{
//!     "credential": "secret",
//!     "streamNamePrefix": "0xabc/gas/",
//!     "streamNameBehavior": "SUFFIX"
//! }"#).unwrap();
//!
//! assert_eq!(config.stream_name_behavior, NamingStrategy::Suffix);
//! assert_eq!(config.invalid_record_strategy, InvalidRecordStrategy::Skip);
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ConfigurationError;
use crate::network::Network;

pub mod constants;

use constants::{endpoints, DEFAULT_FETCH_TIMEOUT};

/// Read and deserialize a JSON configuration document.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigurationError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigurationError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Configuration for the gas fee source.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Blocknative API key
    pub block_native_api_key: String,

    /// Alchemy API key
    pub alchemy_api_key: String,

    /// Networks to aggregate; every known network when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<Network>>,

    /// Per-provider fetch deadline in seconds
    /// Default: 30
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_secs: Option<u64>,
}

impl SourceConfig {
    /// Load and validate a source configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let config: Self = load_json(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Networks to aggregate, deduplicated, in configured order.
    #[must_use]
    pub fn networks(&self) -> Vec<Network> {
        match &self.networks {
            Some(networks) => {
                let mut unique = Vec::with_capacity(networks.len());
                for network in networks {
                    if !unique.contains(network) {
                        unique.push(*network);
                    }
                }
                unique
            }
            None => Network::ALL.to_vec(),
        }
    }

    /// Effective per-provider fetch deadline.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }

    /// Check constraints that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.block_native_api_key.trim().is_empty() {
            return Err(ConfigurationError::invalid_config(
                "blockNativeApiKey must not be empty",
            ));
        }
        if self.alchemy_api_key.trim().is_empty() {
            return Err(ConfigurationError::invalid_config(
                "alchemyApiKey must not be empty",
            ));
        }
        if matches!(&self.networks, Some(n) if n.is_empty()) {
            return Err(ConfigurationError::invalid_config(
                "networks must list at least one network",
            ));
        }
        if self.fetch_timeout_secs == Some(0) {
            return Err(ConfigurationError::invalid_config(
                "fetchTimeoutSecs must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("block_native_api_key", &"<redacted>")
            .field("alchemy_api_key", &"<redacted>")
            .field("networks", &self.networks)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .finish()
    }
}

/// Builder for [`SourceConfig`]
#[derive(Debug, Clone)]
pub struct SourceConfigBuilder {
    config: SourceConfig,
}

impl SourceConfigBuilder {
    /// Start from the two provider keys, all networks and the default timeout.
    pub fn new(block_native_api_key: impl Into<String>, alchemy_api_key: impl Into<String>) -> Self {
        Self {
            config: SourceConfig {
                block_native_api_key: block_native_api_key.into(),
                alchemy_api_key: alchemy_api_key.into(),
                networks: None,
                fetch_timeout_secs: None,
            },
        }
    }

    /// Restrict aggregation to the given networks.
    #[must_use]
    pub fn networks(mut self, networks: impl IntoIterator<Item = Network>) -> Self {
        self.config.networks = Some(networks.into_iter().collect());
        self
    }

    /// Override the per-provider fetch deadline (whole seconds, minimum 1).
    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout_secs = Some(timeout.as_secs().max(1));
        self
    }

    /// Build the configuration
    pub fn build(self) -> SourceConfig {
        self.config
    }
}

/// How logical stream names map onto output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingStrategy {
    /// One channel per logical stream: `prefix + stream name`.
    #[serde(rename = "SUFFIX", alias = "STREAM_NAME_AS_STREAMR_SUFFIX")]
    Suffix,

    /// Every record goes to the channel named by the prefix, unchanged.
    #[serde(rename = "IGNORE", alias = "IGNORE_STREAM_NAME")]
    Ignore,

    /// Every record goes to the prefix channel, wrapped under its stream name.
    #[serde(rename = "DATA_PROPERTY", alias = "STREAM_NAME_AS_DATA_PROPERTY")]
    DataProperty,
}

impl NamingStrategy {
    /// Whether each logical stream gets its own channel.
    #[must_use]
    pub fn partitions_by_stream(&self) -> bool {
        matches!(self, Self::Suffix)
    }
}

/// What a write session does with a record it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvalidRecordStrategy {
    /// Abort the session on the first invalid record.
    Fail,
    /// Count the invalid record and continue.
    #[default]
    Skip,
}

/// Configuration for the channel-publishing destination.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationConfig {
    /// Opaque secret for the publish transport
    #[serde(alias = "privateKey")]
    pub credential: String,

    /// Channel name prefix; the whole channel name unless partitioning by stream
    #[serde(alias = "streamrStreamPrefix")]
    pub stream_name_prefix: String,

    /// How logical stream names map onto channels
    pub stream_name_behavior: NamingStrategy,

    /// Invalid record policy
    /// Default: SKIP
    #[serde(default)]
    pub invalid_record_strategy: InvalidRecordStrategy,

    /// Alternate publish gateway (test or staging networks)
    #[serde(default, alias = "devNetUrl", skip_serializing_if = "Option::is_none")]
    pub network_endpoint_override: Option<String>,

    /// Classify and count records without publishing
    #[serde(default, alias = "dry_run")]
    pub dry_run: bool,
}

impl DestinationConfig {
    /// Load and validate a destination configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let config: Self = load_json(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Publish gateway URL, honoring the endpoint override.
    pub fn endpoint(&self) -> Result<Url, ConfigurationError> {
        let raw = self
            .network_endpoint_override
            .as_deref()
            .unwrap_or(endpoints::DEFAULT_PUBLISH_GATEWAY);
        Url::parse(raw)
            .map_err(|e| ConfigurationError::invalid_config(format!("invalid endpoint '{raw}': {e}")))
    }

    /// Check constraints that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.credential.trim().is_empty() {
            return Err(ConfigurationError::invalid_config(
                "credential must not be empty",
            ));
        }
        if !self.stream_name_behavior.partitions_by_stream()
            && self.stream_name_prefix.trim().is_empty()
        {
            return Err(ConfigurationError::invalid_config(
                "streamNamePrefix is the channel name and must not be empty",
            ));
        }
        self.endpoint().map(|_| ())
    }
}

impl fmt::Debug for DestinationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationConfig")
            .field("credential", &"<redacted>")
            .field("stream_name_prefix", &self.stream_name_prefix)
            .field("stream_name_behavior", &self.stream_name_behavior)
            .field("invalid_record_strategy", &self.invalid_record_strategy)
            .field("network_endpoint_override", &self.network_endpoint_override)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
