// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities for Alloy providers.
//!
//! This module provides Tower-based middleware for the JSON-RPC clients used
//! by the fee-history and Alchemy providers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gasfeed::transport::RpcLoggingLayer;
//! use gasfeed::{Network, ProviderName};
//! use alloy_rpc_client::RpcClient;
//! use alloy_transport_http::Http;
//! use tower::Layer;
//!
//! let transport = RpcLoggingLayer::new(ProviderName::Ankr, Network::Polygon).layer(Http::new(rpc_url));
//! let client = RpcClient::new(transport, false);
//! ```

mod logging;

pub use logging::{RpcLoggingLayer, RpcLoggingService};
