// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

/// Counters for one write session.
///
/// Only the session's control loop mutates these; publish tasks report back
/// through their join handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteStats {
    pub messages_read: u64,
    pub records_read: u64,
    pub records_processed: u64,
    pub records_written: u64,
    pub records_errored: u64,
    pub processed_by_stream: BTreeMap<String, u64>,
    /// Keyed by physical channel id
    pub written_by_model: BTreeMap<String, u64>,
}

impl WriteStats {
    pub(crate) fn record_processed_for(&mut self, stream: &str) {
        *self.processed_by_stream.entry(stream.to_string()).or_default() += 1;
    }

    pub(crate) fn record_written_to(&mut self, channel: &str) {
        self.records_written += 1;
        self.records_processed += 1;
        *self.written_by_model.entry(channel.to_string()).or_default() += 1;
    }

    /// Log the session summary at INFO.
    pub fn log(&self, dry_run: bool) {
        let write_msg = if dry_run { "Would write" } else { "Wrote" };
        info!("Read {} messages", self.messages_read);
        info!("Read {} records", self.records_read);
        info!("Processed {} records", self.records_processed);
        info!("Processed records by stream: {}", counts(&self.processed_by_stream));
        info!("{write_msg} {} records", self.records_written);
        info!("{write_msg} records by model: {}", counts(&self.written_by_model));
        info!("Errored {} records", self.records_errored);
    }
}

fn counts(map: &BTreeMap<String, u64>) -> String {
    serde_json::to_string(map).unwrap_or_else(|_| format!("{map:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_records_count_as_processed() {
        let mut stats = WriteStats::default();
        stats.record_processed_for("s");
        stats.record_written_to("chan");
        stats.record_written_to("chan");
        assert_eq!(stats.records_written, 2);
        assert_eq!(stats.records_processed, 2);
        assert_eq!(stats.written_by_model["chan"], 2);
        assert_eq!(stats.processed_by_stream["s"], 1);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(WriteStats::default()).unwrap();
        assert_eq!(json["recordsErrored"], 0);
        assert!(json["writtenByModel"].as_object().unwrap().is_empty());
    }
}
