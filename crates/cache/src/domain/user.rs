use std::time::Duration;

use fanclub_core::cache::{user_key, Result};
use fanclub_core::domain::User;

use crate::TtlStore;

/// Cache for the signed-in user's profile.
pub struct UserCache {
    store: TtlStore,
    ttl: Duration,
}

impl UserCache {
    pub fn new(store: TtlStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn set_user(&self, user: &User) -> Result<()> {
        self.store.set(user_key(), user, Some(self.ttl)).await
    }

    pub async fn get_user(&self) -> Option<User> {
        self.store.get(user_key()).await
    }

    pub async fn clear_user(&self) -> Result<()> {
        self.store.remove(user_key()).await
    }

    /// Returns true if a live profile is cached, without evicting anything.
    pub async fn is_cached(&self) -> bool {
        self.store.is_live::<User>(user_key()).await
    }
}
