// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the provider credential check

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use gasfeed::{
    ConfigurationError, ConnectionChecker, GasProvider, Network, ProviderName, Status,
};
use helpers::MockGasProvider;

fn checker(list: Vec<MockGasProvider>) -> ConnectionChecker {
    ConnectionChecker::new(
        list.into_iter()
            .map(|p| Arc::new(p) as Arc<dyn GasProvider>)
            .collect(),
    )
}

#[tokio::test]
async fn test_all_valid_credentials_pass() {
    let checker = checker(vec![
        MockGasProvider::new(ProviderName::Blocknative, &[Network::Ethereum]),
        MockGasProvider::new(ProviderName::Alchemy, &[Network::Ethereum]),
    ]);
    assert!(checker.check().await.is_ok());
    assert!(checker.connection_status().await.is_success());
}

#[tokio::test]
async fn test_invalid_provider_is_named_in_failure() {
    let checker = checker(vec![
        MockGasProvider::new(ProviderName::Blocknative, &[Network::Ethereum]),
        MockGasProvider::new(ProviderName::Alchemy, &[Network::Ethereum])
            .with_invalid_credentials("Alchemy API key is invalid"),
    ]);

    let err = checker.check().await.unwrap_err();
    match &err {
        ConfigurationError::InvalidCredentials { provider, reason } => {
            assert_eq!(*provider, ProviderName::Alchemy);
            assert_eq!(reason, "Alchemy API key is invalid");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("Alchemy API key is invalid"));
}

#[tokio::test(start_paused = true)]
async fn test_first_rejection_to_complete_wins() {
    let checker = checker(vec![
        MockGasProvider::new(ProviderName::Blocknative, &[Network::Ethereum])
            .with_delay(Duration::from_secs(5))
            .with_invalid_credentials("Blocknative API key is invalid"),
        MockGasProvider::new(ProviderName::Alchemy, &[Network::Ethereum])
            .with_delay(Duration::from_secs(1))
            .with_invalid_credentials("Alchemy API key is invalid"),
    ]);

    let status = checker.connection_status().await;
    assert_eq!(status.status, Status::Failed);
    let message = status.message.unwrap();
    assert!(message.contains("alchemy"), "{message}");
    assert!(!message.contains("Blocknative"), "{message}");
}

#[tokio::test]
async fn test_empty_provider_set_passes() {
    assert!(checker(Vec::new()).check().await.is_ok());
}
