//! Error types for the publish transport.

/// Errors reported by a [`ChannelPublisher`](crate::destination::ChannelPublisher).
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("Gateway rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The channel does not exist or is not accessible.
    #[error("Channel {channel} not found")]
    ChannelNotFound { channel: String },

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The publisher was already closed.
    #[error("Publisher is closed")]
    Closed,
}
