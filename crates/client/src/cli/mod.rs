//! CLI command definitions.

pub mod cache;
pub mod chat;
pub mod clubs;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Cache-backed CLI client for the fanclub API.
#[derive(Debug, Parser)]
#[command(name = "fanclub-client")]
#[command(about = "Cache-backed CLI client for the fanclub API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "FANCLUB_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// File holding cached entries between runs.
    #[arg(long, env = "FANCLUB_CACHE_FILE", default_value = ".fanclub/cache.json")]
    pub cache_file: PathBuf,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the signed-in user's profile.
    User {
        /// Bypass the cache and re-fetch.
        #[arg(long)]
        refresh: bool,
    },
    /// Club management.
    Clubs(clubs::ClubsCommand),
    /// Chat rooms.
    Chat(chat::ChatCommand),
    /// Cache diagnostics and maintenance.
    Cache(cache::CacheCommand),
    /// Drop every cached entry of this session.
    Logout,
}
