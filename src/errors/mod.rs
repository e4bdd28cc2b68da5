//! Error types for the gasfeed library.
//!
//! Each concern has its own error type, and [`GasfeedError`] unifies them for
//! callers that do not need to tell the sources apart:
//!
//! - [`ProviderError`] - Upstream provider failures. Contained by the
//!   aggregator and never fatal to a sync.
//! - [`ConfigurationError`] - Bad configuration, rejected credentials, or an
//!   output channel that cannot be resolved. Fatal at check or session start.
//! - [`RecordParseError`] - A malformed input line. Fatal only under the
//!   `FAIL` invalid-record strategy.
//! - [`WriteError`] - Anything that aborts a write session.
//! - [`PublishError`] - Failures of the publish transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use gasfeed::{WriteAborted, WriteError};
//!
//! match coordinator.write(input).await {
//!     Ok(outcome) => emit(outcome.states),
//!     Err(WriteAborted { error: WriteError::UndefinedStream { stream }, .. }) => {
//!         eprintln!("catalog does not declare {stream}");
//!     }
//!     Err(aborted) => eprintln!("write failed after {} records: {}", aborted.stats.records_written, aborted.error),
//! }
//! ```

mod config;
mod provider;
mod publish;
mod write;

pub use config::ConfigurationError;
pub use provider::ProviderError;
pub use publish::PublishError;
pub use write::{RecordParseError, WriteError};

/// Unified error type for all gasfeed operations.
#[derive(Debug, thiserror::Error)]
pub enum GasfeedError {
    /// Error from an upstream provider.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Configuration or connectivity error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Error from a destination write session.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}
