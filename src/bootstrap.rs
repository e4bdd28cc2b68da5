// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line entry point.
//!
//! Protocol messages are written to stdout, one JSON envelope per line.
//! Logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    default_providers, destination::state_lines, ConfiguredCatalog, ConnectionChecker,
    ConnectionStatus, Destination, DestinationConfig, Message, SourceConfig, SourceEmitter,
};

/// Gas fee source and channel-publishing destination.
#[derive(Debug, Parser)]
#[command(name = "gasfeed", version, about)]
pub struct Cli {
    /// Log output format
    #[arg(long, env = "GASFEED_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gas fee source operations
    #[command(subcommand)]
    Source(SourceCommand),

    /// Destination operations
    #[command(subcommand)]
    Destination(DestinationCommand),
}

#[derive(Debug, Subcommand)]
pub enum SourceCommand {
    /// Validate provider credentials
    Check {
        #[arg(long)]
        config: PathBuf,
    },
    /// List the streams the source emits
    Discover {
        #[arg(long)]
        config: PathBuf,
    },
    /// Aggregate fees for every configured network
    Read {
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum DestinationCommand {
    /// Validate the publish credential
    Check {
        #[arg(long)]
        config: PathBuf,
    },
    /// Publish records read from stdin
    Write {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        catalog: PathBuf,
        /// Classify and count records without publishing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Source(command) => run_source(command).await,
        Command::Destination(command) => run_destination(command).await,
    }
}

async fn run_source(command: SourceCommand) -> anyhow::Result<()> {
    match command {
        SourceCommand::Check { config } => {
            let config = SourceConfig::from_path(&config)?;
            let status = ConnectionChecker::new(default_providers(&config))
                .connection_status()
                .await;
            report_status(status)
        }
        SourceCommand::Discover { config } => {
            let config = SourceConfig::from_path(&config)?;
            let catalog = SourceEmitter::from_config(&config).discover();
            emit(&Message::Catalog { catalog })
        }
        SourceCommand::Read { config } => {
            let config = SourceConfig::from_path(&config)?;
            let emitter = SourceEmitter::from_config(&config);
            info!(networks = emitter.networks().len(), "Reading gas fees");
            for message in emitter.read().await? {
                emit(&message)?;
            }
            Ok(())
        }
    }
}

async fn run_destination(command: DestinationCommand) -> anyhow::Result<()> {
    match command {
        DestinationCommand::Check { config } => {
            let config = DestinationConfig::from_path(&config)?;
            let status = Destination::from_config(config)?.check().await;
            report_status(status)
        }
        DestinationCommand::Write {
            config,
            catalog,
            dry_run,
        } => {
            let config = DestinationConfig::from_path(&config)?;
            let catalog = ConfiguredCatalog::from_path(&catalog)?;
            let coordinator = Destination::from_config(config)?
                .open(&catalog, dry_run)
                .await
                .context("Failed to start write session")?;

            let outcome = coordinator
                .write(BufReader::new(tokio::io::stdin()))
                .await?;
            for line in state_lines(&outcome.states)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn emit(message: &Message) -> anyhow::Result<()> {
    println!("{}", message.to_line()?);
    Ok(())
}

fn report_status(status: ConnectionStatus) -> anyhow::Result<()> {
    let succeeded = status.is_success();
    let message = status.message.clone();
    emit(&Message::from(status))?;
    if !succeeded {
        bail!(message.unwrap_or_else(|| "Connection check failed".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_destination_write() {
        let cli = Cli::try_parse_from([
            "gasfeed",
            "destination",
            "write",
            "--config",
            "d.json",
            "--catalog",
            "c.json",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Destination(DestinationCommand::Write { dry_run, catalog, .. }) => {
                assert!(dry_run);
                assert_eq!(catalog, PathBuf::from("c.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_source_read() {
        let cli =
            Cli::try_parse_from(["gasfeed", "--log-format", "json", "source", "read", "--config", "s.json"])
                .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Source(SourceCommand::Read { .. })));
    }
}
