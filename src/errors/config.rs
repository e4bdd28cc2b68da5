//! Error types for configuration and connection checks.
//!
//! These errors are fatal: they surface either from a `check` operation or
//! before a write session processes its first record.

use std::path::PathBuf;

use super::PublishError;
use crate::providers::ProviderName;

/// Errors raised while loading configuration or validating connectivity.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A provider rejected its credentials.
    #[error("Connection check failed for {provider}: {reason}")]
    InvalidCredentials {
        provider: ProviderName,
        /// Failure reason reported by the provider probe
        reason: String,
    },

    /// An output channel could not be resolved for a declared stream.
    #[error("Failed to get channel {channel}")]
    ChannelResolution {
        channel: String,
        #[source]
        source: PublishError,
    },

    /// The publish transport could not be initialized or verified.
    #[error("Failed to initialize publish client")]
    PublisherUnavailable {
        #[source]
        source: PublishError,
    },

    /// The configuration is structurally valid JSON but semantically wrong.
    #[error("Invalid configuration: {details}")]
    InvalidConfig { details: String },

    /// A configuration file could not be read.
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for the expected shape.
    #[error("Failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigurationError {
    /// Create an `InvalidConfig` error with details.
    pub fn invalid_config(details: impl Into<String>) -> Self {
        ConfigurationError::InvalidConfig {
            details: details.into(),
        }
    }
}
