//! Typed caches over [`TtlStore`](crate::TtlStore), one per domain collection.
//!
//! Collection mutators are read-modify-write at the store level. Each cache
//! serializes its mutators through its own lock, so concurrent tasks cannot
//! lose each other's updates. A miss on the read half counts as an empty
//! collection.

mod chat;
mod clubs;
mod user;

pub use chat::ChatCache;
pub use clubs::ClubsCache;
pub use user::UserCache;
