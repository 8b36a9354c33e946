//! fanclub_core - pure types and functions for the fanclub client cache.
//!
//! Nothing in this crate performs I/O. The imperative shell lives in
//! `fanclub_cache`.

pub mod cache;
pub mod domain;
pub mod fetch;
