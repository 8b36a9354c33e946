//! Pure functions for encoding/decoding cache envelopes to/from the stored string form.
//!
//! Entries are stored as JSON so that values in the backing medium stay
//! human-readable and easy to inspect.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use thiserror::Error;

use crate::domain::Versioned;

use super::CacheEntry;

/// Errors that can occur during envelope serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize an entry.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// The stored string is not a valid envelope for the requested type.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
    /// The entry was written under a different schema version.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Liveness metadata of a stored entry, decoded without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    pub version: u32,
    pub written_at: i64,
    pub ttl_ms: u64,
}

impl EntryMeta {
    /// Returns true if the entry may still be served at `now_ms`.
    pub fn is_live(&self, now_ms: i64) -> bool {
        super::is_live(self.written_at, self.ttl_ms, now_ms)
    }
}

/// Serializes an entry to its stored JSON string.
pub fn encode_entry<T: Serialize>(entry: &CacheEntry<T>) -> Result<String> {
    serde_json::to_string(entry).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes a stored JSON string into a typed entry.
///
/// The schema version is checked before the payload is interpreted, so an
/// entry written under another version never reaches the caller.
pub fn decode_entry<T>(raw: &str) -> Result<CacheEntry<T>>
where
    T: DeserializeOwned + Versioned,
{
    into_typed(decode_envelope(raw)?)
}

/// Deserializes a stored JSON string into an envelope with an untyped payload.
pub fn decode_envelope(raw: &str) -> Result<CacheEntry<serde_json::Value>> {
    serde_json::from_str(raw).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Interprets the payload of an untyped envelope as `T`.
pub fn into_typed<T>(envelope: CacheEntry<serde_json::Value>) -> Result<CacheEntry<T>>
where
    T: DeserializeOwned + Versioned,
{
    if envelope.version != T::SCHEMA_VERSION {
        return Err(SerializationError::VersionMismatch {
            expected: T::SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    let data = serde_json::from_value(envelope.data)
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))?;

    Ok(CacheEntry {
        version: envelope.version,
        written_at: envelope.written_at,
        ttl_ms: envelope.ttl_ms,
        data,
    })
}

/// Decodes only the envelope metadata of a stored entry.
pub fn decode_meta(raw: &str) -> Result<EntryMeta> {
    let envelope: CacheEntry<IgnoredAny> = serde_json::from_str(raw)
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))?;
    Ok(EntryMeta {
        version: envelope.version,
        written_at: envelope.written_at,
        ttl_ms: envelope.ttl_ms,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::{Club, User};

    fn club_entry() -> CacheEntry<Vec<Club>> {
        CacheEntry::new(
            vec![Club::new("1", "A"), Club::new("2", "B")],
            Club::SCHEMA_VERSION,
            1_700_000_000_000,
            Duration::from_secs(600),
        )
    }

    #[test]
    fn test_encode_uses_envelope_fields() {
        let raw = encode_entry(&club_entry()).expect("serialize should succeed");
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["written_at"], 1_700_000_000_000i64);
        assert_eq!(value["ttl_ms"], 600_000);
        assert_eq!(value["data"][1]["name"], "B");
    }

    #[test]
    fn test_decode_typed_entry() {
        let entry = club_entry();
        let raw = encode_entry(&entry).unwrap();
        let decoded: CacheEntry<Vec<Club>> = decode_entry(&raw).expect("decode should succeed");
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_decode_rejects_malformed_string() {
        let result = decode_entry::<User>("not valid json");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        // A club list read back as a user.
        let raw = encode_entry(&CacheEntry::new(
            vec![Club::new("1", "A")],
            User::SCHEMA_VERSION,
            0,
            Duration::from_secs(1),
        ))
        .unwrap();
        let result = decode_entry::<User>(&raw);
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_other_schema_version() {
        let raw = r#"{"version":0,"written_at":0,"ttl_ms":1000,"data":{"id":"u1","username":"x"}}"#;
        let result = decode_entry::<User>(raw);
        assert_eq!(
            result.unwrap_err(),
            SerializationError::VersionMismatch {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn test_decode_meta_ignores_payload() {
        let raw = r#"{"version":7,"written_at":100,"ttl_ms":50,"data":[1,{"deep":true}]}"#;
        let meta = decode_meta(raw).unwrap();
        assert_eq!(meta.version, 7);
        assert!(meta.is_live(150));
        assert!(!meta.is_live(151));
    }

    #[test]
    fn test_decode_meta_rejects_legacy_shape() {
        // Entries without an envelope (older deployments) are unreadable.
        assert!(decode_meta(r#"{"data":1,"timestamp":0}"#).is_err());
    }
}
