// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Concurrent provider credential checks

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn, Instrument};

use crate::errors::ConfigurationError;
use crate::protocol::ConnectionStatus;
use crate::providers::{CredentialCheck, GasProvider};
use crate::spans;

/// Runs every provider's credential probe at once.
#[derive(Clone)]
pub struct ConnectionChecker {
    providers: Vec<Arc<dyn GasProvider>>,
}

impl ConnectionChecker {
    pub fn new(providers: Vec<Arc<dyn GasProvider>>) -> Self {
        Self { providers }
    }

    /// Succeeds iff every provider accepts its credentials.
    ///
    /// The first rejection to complete is reported; probes still in flight
    /// are dropped.
    pub async fn check(&self) -> Result<(), ConfigurationError> {
        async {
            let mut probes: FuturesUnordered<_> = self
                .providers
                .iter()
                .map(|provider| async move { (provider.name(), provider.check_credentials().await) })
                .collect();

            while let Some((provider, verdict)) = probes.next().await {
                if let CredentialCheck::Invalid(reason) = verdict {
                    warn!(provider = %provider, reason = %reason, "Credential check failed");
                    return Err(ConfigurationError::InvalidCredentials { provider, reason });
                }
            }
            info!("All provider credentials accepted");
            Ok(())
        }
        .instrument(spans::check_credentials(self.providers.len()))
        .await
    }

    /// Run the check and express the verdict as a protocol status.
    pub async fn connection_status(&self) -> ConnectionStatus {
        ConnectionStatus::from_result(self.check().await)
    }
}
