//! CLI for the urishort link shortener.

mod commands;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use urishort_core::config::{self, ShortenerConfig};
use urishort_core::ShortenService;

use commands::{run_digest, run_normalize, run_resolve, run_shorten, run_status};
use store::CliStore;

/// Top-level CLI for the urishort link shortener.
#[derive(Debug, Parser)]
#[command(name = "urishort")]
#[command(about = "urishort: content-addressed URI shortener", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/urishort/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use a throwaway in-memory store instead of the SQLite database.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Shorten one or more URIs; prints the identifier and renderings as JSON.
    Shorten {
        /// Free-form URI text (scheme optional).
        #[arg(required = true)]
        uris: Vec<String>,
    },

    /// Look up a short identifier.
    Resolve {
        /// Short identifier.
        id: String,
        /// Print a human-readable summary instead of JSON.
        #[arg(long)]
        text: bool,
    },

    /// Report service status (Ok, Maintenance or Down).
    Status,

    /// Canonicalize a URI without touching storage.
    Normalize {
        uri: String,
    },

    /// Print the SHA-256 fingerprint of a URI's canonical form.
    Digest {
        uri: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => {
                let cfg = config::load_or_init()?;
                cfg.validate()?;
                cfg
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            // Storage-free commands never open the database.
            CliCommand::Normalize { uri } => run_normalize(&cfg, &uri)?,
            CliCommand::Digest { uri } => run_digest(&cfg, &uri)?,
            CliCommand::Shorten { uris } => {
                let service = open_service(cfg, cli.ephemeral).await?;
                run_shorten(&service, &uris).await?
            }
            CliCommand::Resolve { id, text } => {
                let service = open_service(cfg, cli.ephemeral).await?;
                run_resolve(&service, &id, text).await?
            }
            CliCommand::Status => {
                let service = open_service(cfg, cli.ephemeral).await?;
                run_status(&service).await?
            }
        }

        Ok(())
    }
}

async fn open_service(cfg: ShortenerConfig, ephemeral: bool) -> Result<ShortenService<CliStore>> {
    let store = CliStore::open(&cfg, ephemeral).await?;
    ShortenService::new(cfg, store)
}

#[cfg(test)]
mod tests;
