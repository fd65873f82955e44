//! Command-line interface parsing for pokewrap
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the client configuration used at startup.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::api::{ClientConfig, Page, API_URI_STUB};
use crate::cache::CacheStore;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// `--user-cache` was given but no per-user cache directory exists
    #[error("Could not determine a user cache directory; use --cache <PATH> instead")]
    NoUserCacheDir,

    /// `--timeout 0` would fail every request
    #[error("Invalid timeout: '{0}'. Timeout must be at least one second")]
    InvalidTimeout(u64),
}

/// pokewrap - Look up PokeAPI resources with a local cache
#[derive(Parser, Debug)]
#[command(name = "pokewrap")]
#[command(about = "Look up PokeAPI resources with a local JSON cache")]
#[command(version)]
pub struct Cli {
    /// Base URL of the API
    #[arg(long, global = true, default_value = API_URI_STUB)]
    pub endpoint: String,

    /// Cache file to use (default: ./cache.json)
    #[arg(long, global = true, value_name = "PATH", env = "POKEWRAP_CACHE")]
    pub cache: Option<PathBuf>,

    /// Keep the cache in the per-user cache directory (overrides --cache)
    #[arg(long, global = true)]
    pub user_cache: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Log cache and network activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Actions the CLI can perform
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve one resource and print its JSON body
    ///
    /// Examples:
    ///   pokewrap get pokemon gengar
    ///   pokewrap get move 33
    Get {
        /// Resource type (see `pokewrap types`)
        resource_type: String,
        /// Resource name, or numeric id if it is an integer
        #[arg(allow_negative_numbers = true)]
        name_or_id: String,
    },

    /// List resources of one type
    List {
        /// Resource type (see `pokewrap types`)
        resource_type: String,
        /// Maximum number of entries to return
        #[arg(long)]
        limit: Option<u32>,
        /// Number of entries to skip
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show a summary of one Pokémon
    Pokemon {
        /// Pokémon name, or national dex id if it is an integer
        #[arg(allow_negative_numbers = true)]
        name_or_id: String,
    },

    /// Print every known resource type
    Types,
}

impl Command {
    /// Returns the pagination parameters of a `list` command
    pub fn page(&self) -> Option<Page> {
        match self {
            Command::List { limit, offset, .. } => Some(Page {
                limit: *limit,
                offset: *offset,
            }),
            _ => None,
        }
    }
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Client configuration (endpoint, cache file, timeout)
    pub client: ClientConfig,
    /// Log level used when RUST_LOG is not set
    pub log_level: &'static str,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the timeout is zero or no user cache directory exists
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.timeout == 0 {
            return Err(CliError::InvalidTimeout(cli.timeout));
        }

        let cache_path = if cli.user_cache {
            CacheStore::in_user_cache_dir()
                .ok_or(CliError::NoUserCacheDir)?
                .path()
                .to_path_buf()
        } else {
            match &cli.cache {
                Some(path) => path.clone(),
                None => CacheStore::in_current_dir().path().to_path_buf(),
            }
        };

        let client = ClientConfig::default()
            .with_endpoint(cli.endpoint.clone())
            .with_cache_path(cache_path)
            .with_timeout(Duration::from_secs(cli.timeout));

        Ok(StartupConfig {
            client,
            log_level: if cli.verbose { "debug" } else { "warn" },
        })
    }
}
