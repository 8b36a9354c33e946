/// Default namespace prefix for every key this subsystem writes.
pub const DEFAULT_PREFIX: &str = "sportsfan_cache_";

const USER_KEY: &str = "user";
const CLUBS_KEY: &str = "clubs";
const CHAT_KEY_PREFIX: &str = "chat_";

/// Returns the logical key for the signed-in user's profile.
pub fn user_key() -> &'static str {
    USER_KEY
}

/// Returns the logical key for the club list.
pub fn clubs_key() -> &'static str {
    CLUBS_KEY
}

/// Returns the logical key for one room's chat history.
pub fn chat_key(room_id: &str) -> String {
    format!("{}{}", CHAT_KEY_PREFIX, room_id)
}

/// Returns the physical key stored in the backing medium.
pub fn namespaced(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}

/// Strips the namespace from a physical key.
///
/// Returns `None` for keys that belong to other application state.
///
/// # Examples
///
/// ```
/// use fanclub_core::cache::strip_namespace;
///
/// assert_eq!(strip_namespace("sportsfan_cache_", "sportsfan_cache_clubs"), Some("clubs"));
/// assert_eq!(strip_namespace("sportsfan_cache_", "theme"), None);
/// ```
pub fn strip_namespace<'a>(prefix: &str, physical_key: &'a str) -> Option<&'a str> {
    physical_key.strip_prefix(prefix)
}

/// Extracts the room ID from a logical chat history key, if present.
///
/// # Examples
///
/// ```
/// use fanclub_core::cache::room_id_from_chat_key;
///
/// assert_eq!(room_id_from_chat_key("chat_42"), Some("42"));
/// assert_eq!(room_id_from_chat_key("clubs"), None);
/// assert_eq!(room_id_from_chat_key("chat_"), None);
/// ```
pub fn room_id_from_chat_key(key: &str) -> Option<&str> {
    key.strip_prefix(CHAT_KEY_PREFIX)
        .filter(|room_id| !room_id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keys() {
        assert_eq!(user_key(), "user");
        assert_eq!(clubs_key(), "clubs");
    }

    #[test]
    fn test_chat_key() {
        assert_eq!(chat_key("1"), "chat_1");
        assert_eq!(chat_key("north-stand"), "chat_north-stand");
    }

    #[test]
    fn test_namespaced() {
        assert_eq!(
            namespaced(DEFAULT_PREFIX, clubs_key()),
            "sportsfan_cache_clubs"
        );
        assert_eq!(
            namespaced(DEFAULT_PREFIX, &chat_key("7")),
            "sportsfan_cache_chat_7"
        );
    }

    #[test]
    fn test_strip_namespace_roundtrip() {
        let physical = namespaced(DEFAULT_PREFIX, &chat_key("7"));
        assert_eq!(strip_namespace(DEFAULT_PREFIX, &physical), Some("chat_7"));
    }

    #[test]
    fn test_strip_namespace_rejects_foreign_keys() {
        assert_eq!(strip_namespace(DEFAULT_PREFIX, "auth_token"), None);
        assert_eq!(strip_namespace(DEFAULT_PREFIX, "sportsfan_other"), None);
    }
}
