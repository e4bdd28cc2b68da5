// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Loading configuration and catalog files from disk

use std::io::Write;
use std::time::Duration;

use gasfeed::{
    ConfigurationError, ConfiguredCatalog, DestinationConfig, InvalidRecordStrategy,
    NamingStrategy, Network, SourceConfig,
};
use serde_json::json;
use tempfile::NamedTempFile;

fn write_json(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

#[test]
fn test_load_source_config() {
    let file = write_json(json!({
        "blockNativeApiKey": "bn",
        "alchemyApiKey": "al",
        "networks": ["polygon", "base", "polygon"],
        "fetchTimeoutSecs": 5
    }));

    let config = SourceConfig::from_path(file.path()).unwrap();
    assert_eq!(config.networks(), vec![Network::Polygon, Network::Base]);
    assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
}

#[test]
fn test_source_config_rejects_unknown_network() {
    let file = write_json(json!({
        "blockNativeApiKey": "bn",
        "alchemyApiKey": "al",
        "networks": ["solana"]
    }));
    assert!(matches!(
        SourceConfig::from_path(file.path()),
        Err(ConfigurationError::Parse { .. })
    ));
}

#[test]
fn test_source_config_validation_runs_on_load() {
    let file = write_json(json!({ "blockNativeApiKey": "", "alchemyApiKey": "al" }));
    assert!(matches!(
        SourceConfig::from_path(file.path()),
        Err(ConfigurationError::InvalidConfig { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    match DestinationConfig::from_path(&missing) {
        Err(ConfigurationError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_load_destination_config_with_legacy_keys() {
    let file = write_json(json!({
        "privateKey": "0xkey",
        "streamrStreamPrefix": "0xabc/",
        "streamNameBehavior": "STREAM_NAME_AS_STREAMR_SUFFIX",
        "devNetUrl": "http://10.200.10.1:8787",
        "dry_run": true
    }));

    let config = DestinationConfig::from_path(file.path()).unwrap();
    assert_eq!(config.credential, "0xkey");
    assert_eq!(config.stream_name_prefix, "0xabc/");
    assert_eq!(config.stream_name_behavior, NamingStrategy::Suffix);
    assert_eq!(config.invalid_record_strategy, InvalidRecordStrategy::Skip);
    assert!(config.dry_run);
    assert_eq!(config.endpoint().unwrap().as_str(), "http://10.200.10.1:8787/");
}

#[test]
fn test_destination_naming_long_forms() {
    for (raw, expected) in [
        ("IGNORE_STREAM_NAME", NamingStrategy::Ignore),
        ("STREAM_NAME_AS_DATA_PROPERTY", NamingStrategy::DataProperty),
        ("DATA_PROPERTY", NamingStrategy::DataProperty),
        ("IGNORE", NamingStrategy::Ignore),
    ] {
        let file = write_json(json!({
            "credential": "c",
            "streamNamePrefix": "chan",
            "streamNameBehavior": raw,
            "invalidRecordStrategy": "FAIL"
        }));
        let config = DestinationConfig::from_path(file.path()).unwrap();
        assert_eq!(config.stream_name_behavior, expected, "{raw}");
        assert_eq!(config.invalid_record_strategy, InvalidRecordStrategy::Fail);
    }
}

#[test]
fn test_load_configured_catalog() {
    let file = write_json(json!({
        "streams": [
            { "stream": { "name": "gas-station/polygon", "json_schema": {} }, "sync_mode": "full_refresh", "destination_sync_mode": "append" }
        ]
    }));
    let catalog = ConfiguredCatalog::from_path(file.path()).unwrap();
    assert_eq!(catalog.stream_names(), vec!["gas-station/polygon"]);
}
