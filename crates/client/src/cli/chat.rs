//! Chat CLI commands.

use clap::{Parser, Subcommand};

/// Chat commands.
#[derive(Debug, Parser)]
pub struct ChatCommand {
    #[command(subcommand)]
    pub action: ChatAction,
}

/// Available chat actions.
#[derive(Debug, Subcommand)]
pub enum ChatAction {
    /// Show a room's message history.
    History {
        /// Room (club) ID.
        room_id: String,
    },
    /// Post a message to a room.
    Send {
        /// Room (club) ID.
        room_id: String,
        /// Message text.
        body: String,
    },
}
