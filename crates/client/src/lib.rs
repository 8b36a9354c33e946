//! fanclub_client - API client and cache-backed CLI for the fanclub platform.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;

pub use client::FanclubClient;
pub use error::{ClientError, Result};
