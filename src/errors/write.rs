//! Error types for destination write sessions.

use super::{ConfigurationError, PublishError};

/// A single input line could not be turned into a usable message.
#[derive(Debug, thiserror::Error)]
pub enum RecordParseError {
    /// The line is not a valid message envelope.
    #[error("Failed to parse message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The line is not valid UTF-8.
    #[error("Line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A RECORD envelope without a record payload.
    #[error("Empty record")]
    EmptyRecord,
}

/// Errors that abort a write session.
///
/// Only [`WriteError::InvalidRecord`] is subject to the invalid-record
/// strategy; every other variant is fatal regardless of it.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A malformed record under the `FAIL` strategy.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] RecordParseError),

    /// A record names a stream that was never resolved to a channel.
    #[error("Undefined stream {stream}")]
    UndefinedStream { stream: String },

    /// Publishing a record failed.
    #[error("Error syncing record of stream {stream} to channel {channel} ({shape})")]
    Publish {
        stream: String,
        channel: String,
        /// Short description of the payload that was being published
        shape: String,
        #[source]
        source: PublishError,
    },

    /// The session could not start.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Reading the input stream failed.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A publish task panicked or was cancelled.
    #[error("Publish task failed: {0}")]
    PublishTaskFailed(#[from] tokio::task::JoinError),
}
