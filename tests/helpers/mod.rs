// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for gasfeed integration tests
//!
//! Provides mock implementations of the provider and publisher traits so the
//! aggregation and write pipelines can be tested without network access.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gasfeed::{
    ChannelHandle, ChannelPublisher, CredentialCheck, FeeSnapshot, GasProvider, Network,
    ProviderError, ProviderName, PublishError,
};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
enum FetchBehavior {
    Succeed,
    Fail,
}

/// Mock GasProvider with configurable latency, failures and credential verdict
///
/// # Example
///
/// ```rust,ignore
/// let slow = MockGasProvider::new(ProviderName::Ankr, &[Network::Polygon])
///     .with_delay(Duration::from_secs(45));
/// let broken = MockGasProvider::new(ProviderName::Llama, &[Network::Polygon]).failing();
/// ```
pub struct MockGasProvider {
    name: ProviderName,
    networks: Vec<Network>,
    delay: Duration,
    behavior: FetchBehavior,
    credentials: CredentialCheck,
    fetched: Mutex<Vec<Network>>,
}

impl MockGasProvider {
    /// A provider that answers immediately with a small snapshot
    pub fn new(name: ProviderName, networks: &[Network]) -> Self {
        Self {
            name,
            networks: networks.to_vec(),
            delay: Duration::ZERO,
            behavior: FetchBehavior::Succeed,
            credentials: CredentialCheck::Valid,
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer every fetch with an error
    pub fn failing(mut self) -> Self {
        self.behavior = FetchBehavior::Fail;
        self
    }

    /// Reject credentials with `reason`
    pub fn with_invalid_credentials(mut self, reason: &str) -> Self {
        self.credentials = CredentialCheck::Invalid(reason.to_string());
        self
    }

    /// Networks this provider was asked about, in call order
    pub fn fetched(&self) -> Vec<Network> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl GasProvider for MockGasProvider {
    fn name(&self) -> ProviderName {
        self.name
    }

    fn supported_networks(&self) -> &[Network] {
        &self.networks
    }

    async fn fetch_fee(&self, network: Network) -> Result<FeeSnapshot, ProviderError> {
        self.fetched.lock().unwrap().push(network);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.behavior {
            FetchBehavior::Succeed => FeeSnapshot::from_json(
                self.name,
                json!({ "network": network.as_str(), "gasPrice": 1 }),
            ),
            FetchBehavior::Fail => Err(ProviderError::invalid_response(self.name, "mock failure")),
        }
    }

    async fn check_credentials(&self) -> CredentialCheck {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.credentials.clone()
    }
}

/// Mock ChannelPublisher that records every call
pub struct RecordingPublisher {
    missing_channels: HashSet<String>,
    failing_channels: HashSet<String>,
    delay: Duration,
    resolved: Mutex<Vec<String>>,
    published: Mutex<Vec<(String, Value)>>,
    publish_calls: AtomicUsize,
    closed: AtomicBool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            missing_channels: HashSet::new(),
            failing_channels: HashSet::new(),
            delay: Duration::ZERO,
            resolved: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            publish_calls: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Resolving `channel` fails with `ChannelNotFound`
    pub fn without_channel(mut self, channel: &str) -> Self {
        self.missing_channels.insert(channel.to_string());
        self
    }

    /// Publishing to `channel` is rejected
    pub fn rejecting(mut self, channel: &str) -> Self {
        self.failing_channels.insert(channel.to_string());
        self
    }

    /// Every publish takes `delay` to complete
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    /// Completed publishes as (channel, payload), in completion order
    pub fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().unwrap().clone()
    }

    /// Publish calls started, including failed ones
    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for RecordingPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelPublisher for RecordingPublisher {
    async fn verify(&self) -> Result<(), PublishError> {
        Ok(())
    }

    async fn resolve_channel(&self, name: &str) -> Result<ChannelHandle, PublishError> {
        self.resolved.lock().unwrap().push(name.to_string());
        if self.missing_channels.contains(name) {
            return Err(PublishError::ChannelNotFound {
                channel: name.to_string(),
            });
        }
        Ok(ChannelHandle::new(name))
    }

    async fn publish(&self, channel: &ChannelHandle, payload: &Value) -> Result<(), PublishError> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing_channels.contains(channel.id()) {
            return Err(PublishError::Rejected {
                status: 500,
                body: "mock rejection".to_string(),
            });
        }
        self.published
            .lock()
            .unwrap()
            .push((channel.id().to_string(), payload.clone()));
        Ok(())
    }

    async fn close(&self) -> Result<(), PublishError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A RECORD envelope line
pub fn record_line(stream: &str, data: Value) -> String {
    json!({ "type": "RECORD", "record": { "stream": stream, "data": data } }).to_string()
}

/// A STATE envelope line
pub fn state_line(data: Value) -> String {
    json!({ "type": "STATE", "state": { "data": data } }).to_string()
}

/// Join lines into newline-delimited input
pub fn input(lines: &[String]) -> Vec<u8> {
    let mut out = lines.join("\n");
    out.push('\n');
    out.into_bytes()
}
