// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Newline-delimited JSON message envelopes exchanged with the pipeline runner
//!
//! Every line on stdin or stdout is one [`Message`], tagged by its `type`:
//!
//! ```json
//! {"type":"RECORD","record":{"stream":"gas-station/polygon","data":{"x":1},"emitted_at":1700000000000}}
//! {"type":"STATE","state":{"data":{"cursor":42}}}
//! ```
//!
//! Envelope types this crate does not act on deserialize as
//! [`Message::Other`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::load_json;
use crate::errors::{ConfigurationError, RecordParseError};

/// A protocol message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Record {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        record: Option<RecordMessage>,
    },
    State(StateMessage),
    Log {
        log: LogMessage,
    },
    ConnectionStatus {
        #[serde(rename = "connectionStatus")]
        connection_status: ConnectionStatus,
    },
    Catalog {
        catalog: Catalog,
    },
    #[serde(other)]
    Other,
}

impl Message {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, RecordParseError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Wrap a record in a `RECORD` envelope.
    pub fn record(record: RecordMessage) -> Self {
        Self::Record {
            record: Some(record),
        }
    }

    /// Serialize as a single output line, without the trailing newline.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A data record for one logical stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    pub stream: String,
    pub data: Value,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emitted_at: Option<i64>,
}

/// An opaque checkpoint. Kept verbatim so it can be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl StateMessage {
    /// Checkpoint payload from either `state.data` or a top-level `data`.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.body
            .get("state")
            .and_then(|state| state.get("data"))
            .or_else(|| self.body.get("data"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Succeeded,
    Failed,
}

/// Verdict of a `check` operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConnectionStatus {
    pub fn succeeded() -> Self {
        Self {
            status: Status::Succeeded,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            message: Some(message.into()),
        }
    }

    /// Build a verdict from a check result, using the error chain as message.
    pub fn from_result<E: std::error::Error>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::succeeded(),
            Err(e) => Self::failed(error_chain(&e)),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Succeeded
    }
}

impl From<ConnectionStatus> for Message {
    fn from(connection_status: ConnectionStatus) -> Self {
        Message::ConnectionStatus { connection_status }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// A stream offered by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub name: String,
    #[serde(default)]
    pub json_schema: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supported_sync_modes: Vec<String>,
}

impl StreamDescriptor {
    /// A full-refresh stream with a permissive object schema.
    pub fn full_refresh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json_schema: serde_json::json!({ "type": "object" }),
            supported_sync_modes: vec!["full_refresh".to_string()],
        }
    }
}

/// Streams discovered from a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<StreamDescriptor>,
}

/// A stream selected for a sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    pub stream: StreamDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_sync_mode: Option<String>,
}

/// The streams selected for a sync, as handed to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    pub streams: Vec<ConfiguredStream>,
}

impl ConfiguredCatalog {
    /// Load a configured catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        load_json(path)
    }

    /// Build a catalog selecting the given stream names.
    pub fn from_stream_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            streams: names
                .into_iter()
                .map(|name| ConfiguredStream {
                    stream: StreamDescriptor::full_refresh(name),
                    sync_mode: None,
                    destination_sync_mode: None,
                })
                .collect(),
        }
    }

    /// Logical stream names, in catalog order.
    #[must_use]
    pub fn stream_names(&self) -> Vec<String> {
        self.streams.iter().map(|s| s.stream.name.clone()).collect()
    }
}
