use chrono::NaiveDateTime;
use tracing::error;

use crate::common::error::{DirectoryError, Result};
use crate::domain::*;
use crate::storage::Storage;

fn validate(input: &VenueInput) -> Result<()> {
    let required = [
        ("name", &input.name),
        ("city", &input.city),
        ("state", &input.state),
        ("address", &input.address),
        ("phone", &input.phone),
        ("facebook_link", &input.facebook_link),
        ("image_link", &input.image_link),
        ("website", &input.website),
        ("seeking_description", &input.seeking_description),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DirectoryError::Validation(format!(
                "venue field '{field}' is required"
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

/// All distinct (city, state) pairs, each with its venues annotated with a
/// live upcoming-show count. One count query per venue; fine at this scale.
pub async fn list_grouped(storage: &dyn Storage, now: NaiveDateTime) -> Result<Vec<CityGroup>> {
    let venues = storage.all_venues().await?;

    let mut locations: Vec<(String, String)> = venues
        .iter()
        .map(|v| (v.city.clone(), v.state.clone()))
        .collect();
    locations.sort();
    locations.dedup();

    let mut groups = Vec::with_capacity(locations.len());
    for (city, state) in locations {
        let mut summaries = Vec::new();
        for venue in venues.iter().filter(|v| v.city == city && v.state == state) {
            let Some(id) = venue.id else { continue };
            let num_upcoming_shows = storage.count_upcoming_shows_for_venue(id, now).await?;
            summaries.push(VenueSummary {
                id,
                name: venue.name.clone(),
                num_upcoming_shows,
            });
        }
        groups.push(CityGroup {
            city,
            state,
            venues: summaries,
        });
    }
    Ok(groups)
}

pub async fn detail(storage: &dyn Storage, id: i64, now: NaiveDateTime) -> Result<VenueDetail> {
    let venue = storage
        .get_venue(id)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("venue {id}")))?;

    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();
    for show in storage.shows_for_venue(id).await? {
        let artist = storage
            .get_artist(show.artist_id)
            .await?
            .ok_or_else(|| DirectoryError::Database {
                message: format!("show references missing artist {}", show.artist_id),
            })?;
        let entry = VenueShow {
            artist_id: show.artist_id,
            artist_name: artist.name,
            artist_image_link: artist.image_link,
            start_time: format_show_time(show.start_time),
        };
        if is_upcoming(show.start_time, now) {
            upcoming_shows.push(entry);
        } else {
            past_shows.push(entry);
        }
    }

    Ok(VenueDetail {
        id,
        name: venue.name,
        genres: split_genres(&venue.genres),
        address: venue.address,
        city: venue.city,
        state: venue.state,
        phone: venue.phone,
        website: venue.website,
        facebook_link: venue.facebook_link,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        image_link: venue.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

/// Validates, persists, and returns the new venue's id.
pub async fn create(storage: &dyn Storage, input: &VenueInput) -> Result<i64> {
    validate(input)?;
    let mut venue = Venue::from_input(None, input);
    if let Err(err) = storage.create_venue(&mut venue).await {
        error!("creating venue '{}' failed: {err}", input.name);
        return Err(err.into_write_failure(&format!("venue '{}'", input.name)));
    }
    venue.id.ok_or_else(|| DirectoryError::Database {
        message: "storage returned no id for created venue".into(),
    })
}

/// Full-record overwrite; there is no partial patch.
pub async fn update(storage: &dyn Storage, id: i64, input: &VenueInput) -> Result<()> {
    validate(input)?;
    storage
        .get_venue(id)
        .await?
        .ok_or_else(|| DirectoryError::NotFound(format!("venue {id}")))?;

    let venue = Venue::from_input(Some(id), input);
    if let Err(err) = storage.update_venue(&venue).await {
        error!("updating venue {id} failed: {err}");
        return Err(err.into_write_failure(&format!("venue '{}'", input.name)));
    }
    Ok(())
}

pub async fn delete(storage: &dyn Storage, id: i64) -> Result<()> {
    if let Err(err) = storage.delete_venue(id).await {
        if matches!(err, DirectoryError::NotFound(_)) {
            return Err(err);
        }
        error!("deleting venue {id} failed: {err}");
        return Err(err.into_write_failure(&format!("venue {id}")));
    }
    Ok(())
}
