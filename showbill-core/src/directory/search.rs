use chrono::NaiveDateTime;

use crate::common::error::Result;
use crate::domain::{SearchMatch, SearchResults};
use crate::storage::Storage;

// Match counts reflect upcoming shows only; see DESIGN.md for the decision.

/// Case-insensitive substring search over venue names. An empty term
/// matches every row.
pub async fn venues(storage: &dyn Storage, term: &str, now: NaiveDateTime) -> Result<SearchResults> {
    let matches = storage.search_venues(term).await?;
    let mut data = Vec::with_capacity(matches.len());
    for venue in matches {
        let Some(id) = venue.id else { continue };
        let num_upcoming_shows = storage.count_upcoming_shows_for_venue(id, now).await?;
        data.push(SearchMatch {
            id,
            name: venue.name,
            num_upcoming_shows,
        });
    }
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Case-insensitive substring search over artist names.
pub async fn artists(
    storage: &dyn Storage,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults> {
    let matches = storage.search_artists(term).await?;
    let mut data = Vec::with_capacity(matches.len());
    for artist in matches {
        let Some(id) = artist.id else { continue };
        let num_upcoming_shows = storage.count_upcoming_shows_for_artist(id, now).await?;
        data.push(SearchMatch {
            id,
            name: artist.name,
            num_upcoming_shows,
        });
    }
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}
