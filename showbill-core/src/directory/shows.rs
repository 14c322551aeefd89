use tracing::error;

use crate::common::error::{DirectoryError, Result};
use crate::domain::*;
use crate::storage::Storage;

/// Every show ordered by id ascending, projected through its venue and
/// artist names. One lookup per side, the shape the ledger page renders.
pub async fn list(storage: &dyn Storage) -> Result<Vec<ShowListing>> {
    let shows = storage.all_shows().await?;
    let mut listings = Vec::with_capacity(shows.len());
    for show in shows {
        let venue = storage
            .get_venue(show.venue_id)
            .await?
            .ok_or_else(|| DirectoryError::Database {
                message: format!("show references missing venue {}", show.venue_id),
            })?;
        let artist = storage
            .get_artist(show.artist_id)
            .await?
            .ok_or_else(|| DirectoryError::Database {
                message: format!("show references missing artist {}", show.artist_id),
            })?;
        listings.push(ShowListing {
            venue_id: show.venue_id,
            venue_name: venue.name,
            artist_id: show.artist_id,
            artist_name: artist.name,
            artist_image_link: artist.image_link,
            start_time: format_show_time(show.start_time),
        });
    }
    Ok(listings)
}

/// Parses the fixed-pattern timestamp, checks both parents exist, persists.
/// Nothing is written on any failure path.
pub async fn create(storage: &dyn Storage, input: &ShowInput) -> Result<i64> {
    let start_time = parse_show_time(&input.start_time)?;

    storage
        .get_artist(input.artist_id)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("artist {}", input.artist_id)))?;
    storage
        .get_venue(input.venue_id)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("venue {}", input.venue_id)))?;

    let mut show = Show {
        id: None,
        start_time,
        venue_id: input.venue_id,
        artist_id: input.artist_id,
    };
    if let Err(err) = storage.create_show(&mut show).await {
        error!("creating show failed: {err}");
        return Err(err.into_write_failure("show"));
    }
    show.id.ok_or_else(|| DirectoryError::Database {
        message: "storage returned no id for created show".into(),
    })
}
