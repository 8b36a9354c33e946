use std::time::Duration;

use tokio::sync::Mutex;

use fanclub_core::cache::{chat_key, room_id_from_chat_key, Result};
use fanclub_core::domain::ChatMessage;

use crate::TtlStore;

/// Cache for chat histories, one entry per room.
pub struct ChatCache {
    store: TtlStore,
    ttl: Duration,
    write_lock: Mutex<()>,
}

impl ChatCache {
    pub fn new(store: TtlStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn set_chat_history(&self, room_id: &str, messages: &[ChatMessage]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(room_id, messages).await
    }

    pub async fn get_chat_history(&self, room_id: &str) -> Option<Vec<ChatMessage>> {
        self.store.get(&chat_key(room_id)).await
    }

    /// Appends one message to the room's history, starting one if needed.
    pub async fn add_message(&self, room_id: &str, message: &ChatMessage) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.get_chat_history(room_id).await.unwrap_or_default();
        messages.push(message.clone());
        self.write(room_id, &messages).await
    }

    pub async fn clear_chat_history(&self, room_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(&chat_key(room_id)).await
    }

    /// Returns true if the room has a live history, without evicting anything.
    pub async fn is_cached(&self, room_id: &str) -> bool {
        self.store.is_live::<Vec<ChatMessage>>(&chat_key(room_id)).await
    }

    /// Lists rooms that have an entry in the store, live or not.
    pub async fn cached_rooms(&self) -> Result<Vec<String>> {
        let mut rooms: Vec<String> = self
            .store
            .keys()
            .await?
            .iter()
            .filter_map(|key| room_id_from_chat_key(key).map(str::to_string))
            .collect();
        rooms.sort();
        Ok(rooms)
    }

    async fn write(&self, room_id: &str, messages: &[ChatMessage]) -> Result<()> {
        tracing::debug!(room_id, count = messages.len(), "Writing chat history");
        self.store
            .set(&chat_key(room_id), messages, Some(self.ttl))
            .await
    }
}
