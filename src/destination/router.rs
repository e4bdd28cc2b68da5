// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-record channel lookup and payload shaping

use serde_json::{Map, Value};

use crate::config::NamingStrategy;
use crate::errors::WriteError;
use crate::protocol::RecordMessage;

use super::publisher::ChannelHandle;
use super::resolver::StreamBinding;

/// Where and what to publish for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub stream: String,
    pub channel: ChannelHandle,
    pub payload: Value,
}

impl Route {
    /// Short description of the payload for error context.
    #[must_use]
    pub fn shape(&self) -> String {
        payload_shape(&self.payload)
    }
}

#[derive(Debug, Clone)]
pub struct RecordRouter {
    binding: StreamBinding,
    naming: NamingStrategy,
}

impl RecordRouter {
    pub fn new(binding: StreamBinding, naming: NamingStrategy) -> Self {
        Self { binding, naming }
    }

    /// Route a record to its channel.
    ///
    /// A stream missing from the binding is a [`WriteError::UndefinedStream`].
    pub fn route(&self, record: RecordMessage) -> Result<Route, WriteError> {
        let channel = self
            .binding
            .channel(&record.stream)
            .cloned()
            .ok_or_else(|| WriteError::UndefinedStream {
                stream: record.stream.clone(),
            })?;

        let payload = match self.naming {
            NamingStrategy::DataProperty => {
                let mut wrapped = Map::with_capacity(1);
                wrapped.insert(record.stream.clone(), record.data);
                Value::Object(wrapped)
            }
            NamingStrategy::Suffix | NamingStrategy::Ignore => record.data,
        };

        Ok(Route {
            stream: record.stream,
            channel,
            payload,
        })
    }
}

fn payload_shape(payload: &Value) -> String {
    match payload {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::String(_) => "string".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Null => "null".to_string(),
    }
}
