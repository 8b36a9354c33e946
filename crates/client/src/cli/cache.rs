//! Cache CLI commands.

use clap::{Parser, Subcommand};

/// Cache diagnostics and maintenance commands.
#[derive(Debug, Parser)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Available cache actions.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show which domain caches hold live entries.
    Status,
    /// Show hit/miss statistics for this run.
    Stats {
        /// Warm the cache first so there is activity to report.
        #[arg(long)]
        warm: bool,
        /// Statistics window in seconds.
        #[arg(long, default_value_t = 60)]
        window: i64,
    },
    /// Show the cache activity log for this run.
    Logs {
        /// Warm the cache first so there is activity to report.
        #[arg(long)]
        warm: bool,
    },
    /// Remove every cached entry; other data in the cache file is kept.
    Clear,
    /// Load the user profile and club list ahead of need.
    Warm,
    /// Evict expired entries that were never read again.
    Sweep,
}
