use crate::common::error::Result;
use crate::domain::*;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Storage trait for persisting directory data (venues, artists, shows).
///
/// Operations are primitive CRUD plus the show queries the directory layer
/// aggregates over. Every mutating call is its own transaction: it either
/// commits before returning or leaves no trace.
#[async_trait]
pub trait Storage: Send + Sync {
    // Venue operations
    async fn create_venue(&self, venue: &mut Venue) -> Result<()>;
    async fn get_venue(&self, id: i64) -> Result<Option<Venue>>;
    async fn update_venue(&self, venue: &Venue) -> Result<()>;
    /// Deletes the venue and every show referencing it, atomically.
    async fn delete_venue(&self, id: i64) -> Result<()>;
    async fn all_venues(&self) -> Result<Vec<Venue>>;
    /// Case-insensitive substring match on name; the term is taken
    /// literally, never as a pattern. Empty term matches all.
    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>>;

    // Artist operations
    async fn create_artist(&self, artist: &mut Artist) -> Result<()>;
    async fn get_artist(&self, id: i64) -> Result<Option<Artist>>;
    async fn update_artist(&self, artist: &Artist) -> Result<()>;
    async fn delete_artist(&self, id: i64) -> Result<()>;
    async fn all_artists(&self) -> Result<Vec<Artist>>;
    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>>;

    // Show operations
    async fn create_show(&self, show: &mut Show) -> Result<()>;
    async fn get_show(&self, id: i64) -> Result<Option<Show>>;
    /// All shows ordered by id ascending.
    async fn all_shows(&self) -> Result<Vec<Show>>;
    async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<Show>>;
    async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<Show>>;
    async fn count_upcoming_shows_for_venue(
        &self,
        venue_id: i64,
        now: NaiveDateTime,
    ) -> Result<u32>;
    async fn count_upcoming_shows_for_artist(
        &self,
        artist_id: i64,
        now: NaiveDateTime,
    ) -> Result<u32>;
}
