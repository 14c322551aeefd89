use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::NaiveDateTime;
use tracing::debug;

use super::traits::Storage;
use crate::common::error::{DirectoryError, Result};
use crate::domain::*;
use async_trait::async_trait;

/// In-memory storage implementation for development/testing. Enforces the
/// same foreign-key and cascade semantics as the SQLite schema.
pub struct InMemoryStorage {
    venues: Mutex<HashMap<i64, Venue>>,
    artists: Mutex<HashMap<i64, Artist>>,
    shows: Mutex<HashMap<i64, Show>>,
    next_id: AtomicI64,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            venues: Mutex::new(HashMap::new()),
            artists: Mutex::new(HashMap::new()),
            shows: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn sorted_by_id<T: Clone>(map: &HashMap<i64, T>) -> Vec<T> {
    let mut ids: Vec<i64> = map.keys().copied().collect();
    ids.sort_unstable();
    ids.iter().map(|id| map[id].clone()).collect()
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_venue(&self, venue: &mut Venue) -> Result<()> {
        let id = self.allocate_id();
        venue.id = Some(id);

        let mut venues = self.venues.lock().unwrap();
        venues.insert(id, venue.clone());

        debug!("created venue '{}' with id {}", venue.name, id);
        Ok(())
    }

    async fn get_venue(&self, id: i64) -> Result<Option<Venue>> {
        let venues = self.venues.lock().unwrap();
        Ok(venues.get(&id).cloned())
    }

    async fn update_venue(&self, venue: &Venue) -> Result<()> {
        let id = venue
            .id
            .ok_or_else(|| DirectoryError::Validation("cannot update a venue without an id".into()))?;

        let mut venues = self.venues.lock().unwrap();
        if !venues.contains_key(&id) {
            return Err(DirectoryError::NotFound(format!("venue {id}")));
        }
        venues.insert(id, venue.clone());
        Ok(())
    }

    async fn delete_venue(&self, id: i64) -> Result<()> {
        let mut venues = self.venues.lock().unwrap();
        if venues.remove(&id).is_none() {
            return Err(DirectoryError::NotFound(format!("venue {id}")));
        }
        let mut shows = self.shows.lock().unwrap();
        shows.retain(|_, show| show.venue_id != id);

        debug!("deleted venue {} and its shows", id);
        Ok(())
    }

    async fn all_venues(&self) -> Result<Vec<Venue>> {
        let venues = self.venues.lock().unwrap();
        Ok(sorted_by_id(&venues))
    }

    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        let venues = self.venues.lock().unwrap();
        Ok(sorted_by_id(&venues)
            .into_iter()
            .filter(|v| contains_ci(&v.name, term))
            .collect())
    }

    async fn create_artist(&self, artist: &mut Artist) -> Result<()> {
        let id = self.allocate_id();
        artist.id = Some(id);

        let mut artists = self.artists.lock().unwrap();
        artists.insert(id, artist.clone());

        debug!("created artist '{}' with id {}", artist.name, id);
        Ok(())
    }

    async fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        let artists = self.artists.lock().unwrap();
        Ok(artists.get(&id).cloned())
    }

    async fn update_artist(&self, artist: &Artist) -> Result<()> {
        let id = artist
            .id
            .ok_or_else(|| DirectoryError::Validation("cannot update an artist without an id".into()))?;

        let mut artists = self.artists.lock().unwrap();
        if !artists.contains_key(&id) {
            return Err(DirectoryError::NotFound(format!("artist {id}")));
        }
        artists.insert(id, artist.clone());
        Ok(())
    }

    async fn delete_artist(&self, id: i64) -> Result<()> {
        let mut artists = self.artists.lock().unwrap();
        if artists.remove(&id).is_none() {
            return Err(DirectoryError::NotFound(format!("artist {id}")));
        }
        let mut shows = self.shows.lock().unwrap();
        shows.retain(|_, show| show.artist_id != id);

        debug!("deleted artist {} and its shows", id);
        Ok(())
    }

    async fn all_artists(&self) -> Result<Vec<Artist>> {
        let artists = self.artists.lock().unwrap();
        Ok(sorted_by_id(&artists))
    }

    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        let artists = self.artists.lock().unwrap();
        Ok(sorted_by_id(&artists)
            .into_iter()
            .filter(|a| contains_ci(&a.name, term))
            .collect())
    }

    async fn create_show(&self, show: &mut Show) -> Result<()> {
        // Same referential integrity the SQLite schema enforces.
        {
            let venues = self.venues.lock().unwrap();
            if !venues.contains_key(&show.venue_id) {
                return Err(DirectoryError::Database {
                    message: format!("foreign key violation: venue {}", show.venue_id),
                });
            }
            let artists = self.artists.lock().unwrap();
            if !artists.contains_key(&show.artist_id) {
                return Err(DirectoryError::Database {
                    message: format!("foreign key violation: artist {}", show.artist_id),
                });
            }
        }

        let id = self.allocate_id();
        show.id = Some(id);

        let mut shows = self.shows.lock().unwrap();
        shows.insert(id, show.clone());

        debug!(
            "created show {} (venue {}, artist {})",
            id, show.venue_id, show.artist_id
        );
        Ok(())
    }

    async fn get_show(&self, id: i64) -> Result<Option<Show>> {
        let shows = self.shows.lock().unwrap();
        Ok(shows.get(&id).cloned())
    }

    async fn all_shows(&self) -> Result<Vec<Show>> {
        let shows = self.shows.lock().unwrap();
        Ok(sorted_by_id(&shows))
    }

    async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<Show>> {
        let shows = self.shows.lock().unwrap();
        Ok(sorted_by_id(&shows)
            .into_iter()
            .filter(|s| s.venue_id == venue_id)
            .collect())
    }

    async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<Show>> {
        let shows = self.shows.lock().unwrap();
        Ok(sorted_by_id(&shows)
            .into_iter()
            .filter(|s| s.artist_id == artist_id)
            .collect())
    }

    async fn count_upcoming_shows_for_venue(
        &self,
        venue_id: i64,
        now: NaiveDateTime,
    ) -> Result<u32> {
        let shows = self.shows.lock().unwrap();
        Ok(shows
            .values()
            .filter(|s| s.venue_id == venue_id && is_upcoming(s.start_time, now))
            .count() as u32)
    }

    async fn count_upcoming_shows_for_artist(
        &self,
        artist_id: i64,
        now: NaiveDateTime,
    ) -> Result<u32> {
        let shows = self.shows.lock().unwrap();
        Ok(shows
            .values()
            .filter(|s| s.artist_id == artist_id && is_upcoming(s.start_time, now))
            .count() as u32)
    }
}
