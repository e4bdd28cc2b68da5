// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Write session state machine
//!
//! A session reads newline-delimited envelopes until end of input:
//!
//! - `STATE` messages are buffered.
//! - `RECORD` messages are routed and published concurrently.
//! - Anything else is counted and ignored.
//!
//! At end of input the session drains every outstanding publish, then
//! releases the buffered states in receipt order and closes the publisher.
//! A state is therefore never emitted before the records that preceded it
//! have been published.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn, Instrument};

use crate::config::InvalidRecordStrategy;
use crate::errors::{PublishError, RecordParseError, WriteError};
use crate::protocol::{Message, RecordMessage, StateMessage};
use crate::spans;

use super::publisher::ChannelPublisher;
use super::router::{RecordRouter, Route};
use super::stats::WriteStats;

type PublishOutcome = (Route, Result<(), PublishError>);

/// Result of a completed session.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    /// Buffered states, in receipt order, safe to acknowledge
    pub states: Vec<StateMessage>,
    pub stats: WriteStats,
}

/// A session that ended on a fatal error, with the counters gathered so far.
#[derive(Debug, thiserror::Error)]
#[error("Write session aborted")]
pub struct WriteAborted {
    #[source]
    pub error: WriteError,
    pub stats: WriteStats,
}

/// Drives one write session. Consumed by [`write`](WriteCoordinator::write).
pub struct WriteCoordinator {
    publisher: Arc<dyn ChannelPublisher>,
    router: RecordRouter,
    invalid_records: InvalidRecordStrategy,
    dry_run: bool,
}

/// Mutable state owned by the control loop.
#[derive(Default)]
struct Session {
    stats: WriteStats,
    states: Vec<StateMessage>,
    in_flight: JoinSet<PublishOutcome>,
}

impl WriteCoordinator {
    pub fn new(
        publisher: Arc<dyn ChannelPublisher>,
        router: RecordRouter,
        invalid_records: InvalidRecordStrategy,
        dry_run: bool,
    ) -> Self {
        Self {
            publisher,
            router,
            invalid_records,
            dry_run,
        }
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run the session over `input` to completion.
    ///
    /// Stats are logged on every exit path. On a fatal error outstanding
    /// publishes are aborted and the publisher is still closed.
    pub async fn write<R>(self, input: R) -> Result<WriteOutcome, WriteAborted>
    where
        R: AsyncBufRead + Unpin,
    {
        let span = spans::write_session(self.dry_run, self.invalid_records);
        async move {
            if self.dry_run {
                info!("Dry run is enabled, no records will be published");
            }

            let mut session = Session::default();
            let result = self.run(input, &mut session).await;
            session.stats.log(self.dry_run);

            // aborts anything still in flight
            session.in_flight.shutdown().await;
            self.close().await;

            match result {
                Ok(()) => Ok(WriteOutcome {
                    states: session.states,
                    stats: session.stats,
                }),
                Err(error) => Err(WriteAborted {
                    error,
                    stats: session.stats,
                }),
            }
        }
        .instrument(span)
        .await
    }

    async fn run<R>(&self, input: R, session: &mut Session) -> Result<(), WriteError>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("Reading input");
        let mut lines = input.split(b'\n');
        while let Some(raw) = lines.next_segment().await? {
            self.reap_finished(session)?;
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    self.reject(e.into(), &mut session.stats)?;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            self.handle_line(&line, session)?;
        }
        info!("Closing input");

        debug!(outstanding = session.in_flight.len(), "Draining publishes");
        while let Some(done) = session.in_flight.join_next().await {
            self.settle(done, &mut session.stats)?;
        }
        Ok(())
    }

    fn handle_line(&self, line: &str, session: &mut Session) -> Result<(), WriteError> {
        let message = match Message::parse(line) {
            Ok(message) => message,
            Err(e) => return self.reject(e, &mut session.stats),
        };
        session.stats.messages_read += 1;

        match message {
            Message::State(state) => session.states.push(state),
            Message::Record { record } => {
                session.stats.records_read += 1;
                match record {
                    Some(record) => self.dispatch(record, session)?,
                    None => self.reject(RecordParseError::EmptyRecord, &mut session.stats)?,
                }
            }
            _ => debug!("Ignoring non-record message"),
        }
        Ok(())
    }

    fn dispatch(&self, record: RecordMessage, session: &mut Session) -> Result<(), WriteError> {
        session.stats.record_processed_for(&record.stream);
        let route = self.router.route(record)?;

        if self.dry_run {
            debug!(stream = %route.stream, channel = %route.channel, "Would publish record");
            session.stats.records_processed += 1;
            return Ok(());
        }

        debug!(stream = %route.stream, channel = %route.channel, "Publishing record");
        let publisher = Arc::clone(&self.publisher);
        let span = spans::publish_record(&route.stream, route.channel.id());
        session.in_flight.spawn(
            async move {
                let result = publisher.publish(&route.channel, &route.payload).await;
                (route, result)
            }
            .instrument(span),
        );
        Ok(())
    }

    fn reap_finished(&self, session: &mut Session) -> Result<(), WriteError> {
        while let Some(done) = session.in_flight.try_join_next() {
            self.settle(done, &mut session.stats)?;
        }
        Ok(())
    }

    fn settle(
        &self,
        done: Result<PublishOutcome, JoinError>,
        stats: &mut WriteStats,
    ) -> Result<(), WriteError> {
        let (route, result) = done?;
        match result {
            Ok(()) => {
                stats.record_written_to(route.channel.id());
                Ok(())
            }
            Err(source) => Err(WriteError::Publish {
                shape: route.shape(),
                stream: route.stream,
                channel: route.channel.id().to_string(),
                source,
            }),
        }
    }

    fn reject(&self, e: RecordParseError, stats: &mut WriteStats) -> Result<(), WriteError> {
        stats.records_errored += 1;
        error!(error = %e, "Error processing input");
        match self.invalid_records {
            InvalidRecordStrategy::Fail => Err(WriteError::InvalidRecord(e)),
            InvalidRecordStrategy::Skip => Ok(()),
        }
    }

    async fn close(&self) {
        info!("Closing publish client");
        if let Err(e) = self.publisher.close().await {
            warn!(error = %e, "Failed to close publish client");
        }
    }
}

/// Serialize buffered states as output lines.
pub fn state_lines(states: &[StateMessage]) -> Result<Vec<String>, serde_json::Error> {
    states
        .iter()
        .map(|state| Message::State(state.clone()).to_line())
        .collect()
}

