use chrono::NaiveDateTime;
use tracing::error;

use crate::common::error::{DirectoryError, Result};
use crate::domain::*;
use crate::storage::Storage;

fn validate(input: &ArtistInput) -> Result<()> {
    let required = [
        ("name", &input.name),
        ("city", &input.city),
        ("state", &input.state),
        ("phone", &input.phone),
        ("facebook_link", &input.facebook_link),
        ("image_link", &input.image_link),
        ("website", &input.website),
        ("seeking_description", &input.seeking_description),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DirectoryError::Validation(format!(
                "artist field '{field}' is required"
            )));
        }
    }
    if input.genres.is_empty() {
        return Err(DirectoryError::Validation(
            "at least one genre is required".into(),
        ));
    }
    Ok(())
}

/// Flat {id, name} projection of every artist. No grouping.
pub async fn list(storage: &dyn Storage) -> Result<Vec<ArtistRef>> {
    let artists = storage.all_artists().await?;
    Ok(artists
        .into_iter()
        .filter_map(|a| a.id.map(|id| ArtistRef { id, name: a.name }))
        .collect())
}

pub async fn detail(storage: &dyn Storage, id: i64, now: NaiveDateTime) -> Result<ArtistDetail> {
    let artist = storage
        .get_artist(id)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("artist {id}")))?;

    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();
    for show in storage.shows_for_artist(id).await? {
        let venue = storage
            .get_venue(show.venue_id)
            .await?
            .ok_or_else(|| DirectoryError::Database {
                message: format!("show references missing venue {}", show.venue_id),
            })?;
        let entry = ArtistShow {
            venue_id: show.venue_id,
            venue_name: venue.name,
            venue_image_link: venue.image_link,
            start_time: format_show_time(show.start_time),
        };
        if is_upcoming(show.start_time, now) {
            upcoming_shows.push(entry);
        } else {
            past_shows.push(entry);
        }
    }

    Ok(ArtistDetail {
        id,
        name: artist.name,
        genres: split_genres(&artist.genres),
        city: artist.city,
        state: artist.state,
        phone: artist.phone,
        website: artist.website,
        facebook_link: artist.facebook_link,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        image_link: artist.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

pub async fn create(storage: &dyn Storage, input: &ArtistInput) -> Result<i64> {
    validate(input)?;
    let mut artist = Artist::from_input(None, input);
    if let Err(err) = storage.create_artist(&mut artist).await {
        error!("creating artist '{}' failed: {err}", input.name);
        return Err(err.into_write_failure(&format!("artist '{}'", input.name)));
    }
    artist.id.ok_or_else(|| DirectoryError::Database {
        message: "storage returned no id for created artist".into(),
    })
}

pub async fn update(storage: &dyn Storage, id: i64, input: &ArtistInput) -> Result<()> {
    validate(input)?;
    storage
        .get_artist(id)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("artist {id}")))?;

    let artist = Artist::from_input(Some(id), input);
    if let Err(err) = storage.update_artist(&artist).await {
        error!("updating artist {id} failed: {err}");
        return Err(err.into_write_failure(&format!("artist '{}'", input.name)));
    }
    Ok(())
}

pub async fn delete(storage: &dyn Storage, id: i64) -> Result<()> {
    if let Err(err) = storage.delete_artist(id).await {
        if matches!(err, DirectoryError::NotFound(_)) {
            return Err(err);
        }
        error!("deleting artist {id} failed: {err}");
        return Err(err.into_write_failure(&format!("artist {id}")));
    }
    Ok(())
}
