//! Backing media for the TTL store.
//!
//! Both implement `fanclub_core::cache::KeyValueStorage`:
//!
//! - `MemoryStorage`: process-local map, optionally size-limited
//! - `FileStorage`: JSON file on disk, survives restarts

#[cfg(feature = "file")]
mod file;
mod memory;

#[cfg(feature = "file")]
pub use file::FileStorage;
pub use memory::MemoryStorage;
