//! Club CLI commands.

use clap::{Parser, Subcommand};

/// Club management commands.
#[derive(Debug, Parser)]
pub struct ClubsCommand {
    #[command(subcommand)]
    pub action: ClubsAction,
}

/// Available club actions.
#[derive(Debug, Subcommand)]
pub enum ClubsAction {
    /// List all clubs.
    List {
        /// Bypass the cache and re-fetch.
        #[arg(long)]
        refresh: bool,
    },
    /// Get club by ID.
    Get {
        /// Club ID.
        id: String,
    },
    /// Create a new club.
    Create {
        /// Club name.
        #[arg(long)]
        name: String,
        /// Sport the club follows.
        #[arg(long)]
        sport: Option<String>,
        /// Club description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a club.
    Update {
        /// Club ID.
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New sport.
        #[arg(long)]
        sport: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete club by ID.
    Delete {
        /// Club ID.
        id: String,
    },
}
