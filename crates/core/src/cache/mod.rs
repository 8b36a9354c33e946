mod action;
mod entry;
mod error;
mod keys;
mod resource;
mod serialization;
mod stats;
mod traits;

pub use action::CacheAction;
pub use entry::{is_live, CacheEntry};
pub use error::{ActionError, Result, StorageError};
pub use keys::{
    chat_key, clubs_key, namespaced, room_id_from_chat_key, strip_namespace,
    user_key, DEFAULT_PREFIX,
};
pub use resource::ResourceKey;
pub use serialization::{
    decode_entry, decode_envelope, decode_meta, encode_entry, into_typed, EntryMeta,
    SerializationError,
};
pub use stats::{
    compute_stats, fetch_action, hit_action, CacheStats, HitRatio, MonitorEvent, FETCH_MARKER,
    HIT_MARKER,
};
pub use traits::KeyValueStorage;
