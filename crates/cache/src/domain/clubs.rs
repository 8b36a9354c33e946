use std::time::Duration;

use tokio::sync::Mutex;

use fanclub_core::cache::{clubs_key, Result};
use fanclub_core::domain::Club;

use crate::TtlStore;

/// Cache for the club list, stored as one ordered entry.
pub struct ClubsCache {
    store: TtlStore,
    ttl: Duration,
    write_lock: Mutex<()>,
}

impl ClubsCache {
    pub fn new(store: TtlStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            write_lock: Mutex::new(()),
        }
    }

    /// Replaces the whole list.
    pub async fn set_clubs(&self, clubs: &[Club]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write(clubs).await
    }

    pub async fn get_clubs(&self) -> Option<Vec<Club>> {
        self.store.get(clubs_key()).await
    }

    /// Looks up one club in the cached list.
    pub async fn get_club(&self, club_id: &str) -> Option<Club> {
        self.get_clubs()
            .await?
            .into_iter()
            .find(|club| club.id == club_id)
    }

    /// Replaces the club with the same id in place.
    ///
    /// Leaves the stored list untouched if no club has that id or if the
    /// list is not cached.
    pub async fn update_club(&self, updated: &Club) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut clubs = self.get_clubs().await.unwrap_or_default();

        let Some(slot) = clubs.iter_mut().find(|club| club.id == updated.id) else {
            tracing::trace!(club_id = %updated.id, "Club not cached, nothing to update");
            return Ok(());
        };
        *slot = updated.clone();

        self.write(&clubs).await
    }

    /// Appends a club, starting a new list if none is cached.
    ///
    /// A club whose id is already listed is replaced in place, so ids stay
    /// unique.
    pub async fn add_club(&self, club: &Club) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut clubs = self.get_clubs().await.unwrap_or_default();
        match clubs.iter_mut().find(|cached| cached.id == club.id) {
            Some(slot) => *slot = club.clone(),
            None => clubs.push(club.clone()),
        }
        self.write(&clubs).await
    }

    /// Drops the club with `club_id`. A cold cache ends up holding an empty list.
    pub async fn remove_club(&self, club_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut clubs = self.get_clubs().await.unwrap_or_default();
        clubs.retain(|club| club.id != club_id);
        self.write(&clubs).await
    }

    pub async fn clear_clubs(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(clubs_key()).await
    }

    pub async fn is_cached(&self) -> bool {
        self.store.is_live::<Vec<Club>>(clubs_key()).await
    }

    async fn write(&self, clubs: &[Club]) -> Result<()> {
        tracing::debug!(count = clubs.len(), "Writing club list");
        self.store.set(clubs_key(), clubs, Some(self.ttl)).await
    }
}
