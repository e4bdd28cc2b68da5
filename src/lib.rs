// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Gas fee aggregation for EVM networks, and a channel-publishing destination.
//!
//! # Source
//!
//! [`SourceEmitter`] asks every [`GasProvider`] that covers a network for a
//! fee snapshot, each under its own deadline, and emits one record per
//! network with whatever succeeded. Built-in providers are Blocknative,
//! Alchemy, Ankr and LlamaRPC.
//!
//! # Destination
//!
//! [`Destination`] resolves the catalog's logical streams to output channels
//! once per session, then a [`WriteCoordinator`] publishes records
//! concurrently and releases checkpoint states only after every preceding
//! publish has settled.
//!
//! # Example
//!
//! ```rust,ignore
//! use gasfeed::{SourceConfigBuilder, SourceEmitter};
//!
//! let config = SourceConfigBuilder::new(blocknative_key, alchemy_key).build();
//! for record in SourceEmitter::from_config(&config).emit().await {
//!     println!("{}: {} snapshots", record.network, record.data.len());
//! }
//! ```

pub mod aggregator;
pub mod bootstrap;
pub mod checker;
pub mod config;
pub mod destination;
pub mod errors;
pub mod fees;
pub mod network;
pub mod protocol;
pub mod providers;
pub mod source;
pub(crate) mod spans;
pub mod transport;

pub use aggregator::{AggregatedRecord, NetworkAggregator};
pub use checker::ConnectionChecker;
pub use config::{
    DestinationConfig, InvalidRecordStrategy, NamingStrategy, SourceConfig, SourceConfigBuilder,
};
pub use destination::{
    ChannelHandle, ChannelPublisher, Destination, HttpPublisher, RecordRouter, Route,
    StreamBinding, StreamResolver, WriteAborted, WriteCoordinator, WriteOutcome, WriteStats,
};
pub use errors::{
    ConfigurationError, GasfeedError, ProviderError, PublishError, RecordParseError, WriteError,
};
pub use fees::{fee_options_from_history, FeeData, FeeHistoryError, FeeOptions, FeeSnapshot, FeeTier};
pub use network::Network;
pub use protocol::{
    Catalog, ConfiguredCatalog, ConnectionStatus, Message, RecordMessage, StateMessage, Status,
};
pub use providers::{
    default_providers, AlchemyProvider, BlocknativeProvider, CredentialCheck, FeeHistoryProvider,
    GasProvider, ProviderName,
};
pub use source::{SourceEmitter, SourceRecord};
