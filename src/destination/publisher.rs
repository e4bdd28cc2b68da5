// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Publish transport abstraction and its HTTP gateway implementation
//!
//! The destination only needs four things from a transport: prove the
//! credential works, turn a channel name into a handle, publish a JSON
//! payload to a handle, and release resources at the end of a session.
//!
//! [`HttpPublisher`] talks to a publish gateway over HTTP:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | verify | `GET {base}/health` |
//! | resolve | `GET {base}/streams/{channel}` (404 means no such channel) |
//! | publish | `POST {base}/streams/{channel}/publish` with the JSON payload |
//!
//! Every request carries `Authorization: Bearer <credential>`. Channel names
//! are sent as a single percent-encoded path segment.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::PublishError;

/// A resolved physical output channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelHandle {
    id: String,
}

impl ChannelHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Physical channel identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Capability to publish JSON payloads to named channels.
#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Check that the transport is reachable and the credential accepted.
    async fn verify(&self) -> Result<(), PublishError>;

    /// Look up a channel by name.
    async fn resolve_channel(&self, name: &str) -> Result<ChannelHandle, PublishError>;

    /// Publish one payload.
    async fn publish(&self, channel: &ChannelHandle, payload: &Value) -> Result<(), PublishError>;

    /// Release held resources. Publishing afterwards fails with
    /// [`PublishError::Closed`].
    async fn close(&self) -> Result<(), PublishError>;
}

/// [`ChannelPublisher`] backed by an HTTP publish gateway.
pub struct HttpPublisher {
    client: reqwest::Client,
    base: Url,
    credential: String,
    closed: AtomicBool,
}

impl fmt::Debug for HttpPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPublisher")
            .field("base", &self.base.as_str())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl HttpPublisher {
    pub fn new(base: Url, credential: impl Into<String>) -> Result<Self, PublishError> {
        if base.cannot_be_a_base() {
            return Err(PublishError::InvalidEndpoint(base.to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            credential: credential.into(),
            closed: AtomicBool::new(false),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, PublishError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| PublishError::InvalidEndpoint(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn ensure_open(&self) -> Result<(), PublishError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PublishError::Closed);
        }
        Ok(())
    }
}

async fn rejected(response: reqwest::Response) -> PublishError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    PublishError::Rejected { status, body }
}

#[async_trait]
impl ChannelPublisher for HttpPublisher {
    async fn verify(&self) -> Result<(), PublishError> {
        self.ensure_open()?;
        let response = self
            .client
            .get(self.url(&["health"])?)
            .bearer_auth(&self.credential)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        debug!(gateway = %self.base, "Publish gateway verified");
        Ok(())
    }

    async fn resolve_channel(&self, name: &str) -> Result<ChannelHandle, PublishError> {
        self.ensure_open()?;
        let response = self
            .client
            .get(self.url(&["streams", name])?)
            .bearer_auth(&self.credential)
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(ChannelHandle::new(name)),
            StatusCode::NOT_FOUND => Err(PublishError::ChannelNotFound {
                channel: name.to_string(),
            }),
            _ => Err(rejected(response).await),
        }
    }

    async fn publish(&self, channel: &ChannelHandle, payload: &Value) -> Result<(), PublishError> {
        self.ensure_open()?;
        let response = self
            .client
            .post(self.url(&["streams", channel.id(), "publish"])?)
            .bearer_auth(&self.credential)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), PublishError> {
        self.closed.store(true, Ordering::Release);
        debug!(gateway = %self.base, "Publish client closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher(base: &str) -> HttpPublisher {
        HttpPublisher::new(Url::parse(base).unwrap(), "token").unwrap()
    }

    #[test]
    fn test_channel_names_are_single_segments() {
        let url = publisher("http://localhost:7171")
            .url(&["streams", "0xabc/gas-station/polygon"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:7171/streams/0xabc%2Fgas-station%2Fpolygon"
        );
    }

    #[test]
    fn test_base_path_is_preserved() {
        let url = publisher("http://gateway.test/v1/").url(&["health"]).unwrap();
        assert_eq!(url.as_str(), "http://gateway.test/v1/health");
    }

    #[test]
    fn test_rejects_cannot_be_a_base_urls() {
        let err = HttpPublisher::new(Url::parse("mailto:ops@example.com").unwrap(), "t").unwrap_err();
        assert!(matches!(err, PublishError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn test_publish_after_close_fails() {
        let publisher = publisher("http://localhost:7171");
        publisher.close().await.unwrap();
        let err = publisher
            .publish(&ChannelHandle::new("c"), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Closed));
    }

    #[test]
    fn test_debug_hides_credential() {
        assert!(!format!("{:?}", publisher("http://localhost:7171")).contains("token"));
    }
}
