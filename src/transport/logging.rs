// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for provider RPC clients.
//!
//! Every JSON-RPC call made on behalf of a gas provider is wrapped in a
//! `gasfeed.rpc_call` span tagged with the provider and network, so a slow or
//! failing upstream is attributable in the logs without extra plumbing in the
//! provider code.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

use crate::network::Network;
use crate::providers::ProviderName;

/// A Tower layer that logs RPC calls for one provider and network.
#[derive(Clone, Debug)]
pub struct RpcLoggingLayer {
    provider: ProviderName,
    network: Network,
    /// Whether to log full request/response packets at TRACE
    log_payloads: bool,
}

impl RpcLoggingLayer {
    /// Creates a layer that logs method names, timing and errors.
    pub fn new(provider: ProviderName, network: Network) -> Self {
        Self {
            provider,
            network,
            log_payloads: false,
        }
    }

    /// Also log request and response packets at TRACE level.
    ///
    /// Warning: fee history responses are large.
    pub fn with_payloads(mut self) -> Self {
        self.log_payloads = true;
        self
    }
}

impl<S> Layer<S> for RpcLoggingLayer {
    type Service = RpcLoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RpcLoggingService {
            service,
            provider: self.provider,
            network: self.network,
            log_payloads: self.log_payloads,
        }
    }
}

/// A Tower service that logs provider RPC requests and responses.
#[derive(Clone, Debug)]
pub struct RpcLoggingService<S> {
    service: S,
    provider: ProviderName,
    network: Network,
    log_payloads: bool,
}

impl<S> tower::Service<RequestPacket> for RpcLoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let log_payloads = self.log_payloads;
        let mut service = self.service.clone();
        let method = extract_method(&request);

        let span = tracing::debug_span!(
            "gasfeed.rpc_call",
            provider = %self.provider,
            network = %self.network,
            method = %method,
        );

        Box::pin(
            async move {
                let start = Instant::now();

                if log_payloads {
                    trace!(request = ?request, "RPC request");
                } else {
                    debug!("RPC request: {method}");
                }

                let result = service.call(request).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match &result {
                    Ok(response) if log_payloads => {
                        trace!(response = ?response, duration_ms, "RPC response");
                    }
                    Ok(_) => debug!(duration_ms, "RPC response: {method}"),
                    Err(e) => warn!(error = %e, duration_ms, "RPC error: {method}"),
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Extract the RPC method name from a request packet.
fn extract_method(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.len() {
            0 => "batch(empty)".to_string(),
            1 => reqs[0].method().to_string(),
            n => format!("batch({n} calls)"),
        },
    }
}
