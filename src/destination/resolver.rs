// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Session-start resolution of logical streams to output channels

use std::collections::HashMap;

use futures::future::try_join_all;
use tracing::{info, Instrument};

use crate::config::NamingStrategy;
use crate::errors::ConfigurationError;
use crate::spans;

use super::publisher::{ChannelHandle, ChannelPublisher};

/// Logical stream name to channel mapping, fixed for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamBinding {
    channels: HashMap<String, ChannelHandle>,
}

impl StreamBinding {
    #[must_use]
    pub fn channel(&self, stream: &str) -> Option<&ChannelHandle> {
        self.channels.get(stream)
    }

    /// Number of streams bound to a channel.
    #[must_use]
    pub fn stream_count(&self) -> usize {
        self.channels.len()
    }

    /// Distinct channels behind the binding.
    #[must_use]
    pub fn distinct_channels(&self) -> usize {
        let mut ids: Vec<&str> = self.channels.values().map(ChannelHandle::id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

impl FromIterator<(String, ChannelHandle)> for StreamBinding {
    fn from_iter<I: IntoIterator<Item = (String, ChannelHandle)>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}

/// Resolves every declared logical stream before any record is processed.
pub struct StreamResolver<'a> {
    publisher: &'a dyn ChannelPublisher,
    prefix: &'a str,
    naming: NamingStrategy,
}

impl<'a> StreamResolver<'a> {
    pub fn new(publisher: &'a dyn ChannelPublisher, prefix: &'a str, naming: NamingStrategy) -> Self {
        Self {
            publisher,
            prefix,
            naming,
        }
    }

    /// Channel name a logical stream resolves to.
    #[must_use]
    pub fn channel_name(&self, stream: &str) -> String {
        if self.naming.partitions_by_stream() {
            format!("{}{stream}", self.prefix)
        } else {
            self.prefix.to_string()
        }
    }

    /// Resolve all `streams` concurrently. Any failure is fatal.
    pub async fn resolve(&self, streams: &[String]) -> Result<StreamBinding, ConfigurationError> {
        async {
            let binding: StreamBinding = if self.naming.partitions_by_stream() {
                try_join_all(streams.iter().map(|stream| async move {
                    let channel = self.lookup(self.channel_name(stream)).await?;
                    Ok::<_, ConfigurationError>((stream.clone(), channel))
                }))
                .await?
                .into_iter()
                .collect()
            } else {
                let shared = self.lookup(self.prefix.to_string()).await?;
                streams
                    .iter()
                    .map(|stream| (stream.clone(), shared.clone()))
                    .collect()
            };

            info!(
                streams = binding.stream_count(),
                channels = binding.distinct_channels(),
                "Resolved output channels"
            );
            Ok(binding)
        }
        .instrument(spans::resolve_streams(streams.len(), self.naming))
        .await
    }

    async fn lookup(&self, channel: String) -> Result<ChannelHandle, ConfigurationError> {
        match self.publisher.resolve_channel(&channel).await {
            Ok(handle) => Ok(handle),
            Err(source) => Err(ConfigurationError::ChannelResolution { channel, source }),
        }
    }
}
