use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::error::{DirectoryError, Result};

/// Fixed timestamp pattern shared by show forms, storage, and listings.
pub const SHOW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Genre choices offered by the venue/artist forms.
pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub fn format_show_time(t: NaiveDateTime) -> String {
    t.format(SHOW_TIME_FORMAT).to_string()
}

pub fn parse_show_time(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, SHOW_TIME_FORMAT)
        .map_err(|e| DirectoryError::Validation(format!("invalid start_time '{s}': {e}")))
}

/// Genres persist as a single `", "`-joined column; splitting on the same
/// separator recovers the submitted list.
pub fn join_genres(genres: &[String]) -> String {
    genres.join(", ")
}

pub fn split_genres(genres: &str) -> Vec<String> {
    genres.split(", ").map(str::to_string).collect()
}

/// A show starting exactly at the evaluation instant counts as upcoming,
/// so upcoming/past partition the table.
pub fn is_upcoming(start_time: NaiveDateTime, now: NaiveDateTime) -> bool {
    start_time >= now
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub genres: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<i64>,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub genres: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub venue_id: i64,
    pub artist_id: i64,
}

/// Validated payload for venue create/edit submissions.
#[derive(Debug, Clone)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

#[derive(Debug, Clone)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

#[derive(Debug, Clone)]
pub struct ShowInput {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: String,
}

impl Venue {
    pub fn from_input(id: Option<i64>, input: &VenueInput) -> Self {
        Venue {
            id,
            name: input.name.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            address: input.address.clone(),
            phone: input.phone.clone(),
            image_link: input.image_link.clone(),
            facebook_link: input.facebook_link.clone(),
            genres: join_genres(&input.genres),
            website: input.website.clone(),
            seeking_talent: input.seeking_talent,
            seeking_description: input.seeking_description.clone(),
        }
    }
}

impl Artist {
    pub fn from_input(id: Option<i64>, input: &ArtistInput) -> Self {
        Artist {
            id,
            name: input.name.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            phone: input.phone.clone(),
            image_link: input.image_link.clone(),
            facebook_link: input.facebook_link.clone(),
            genres: join_genres(&input.genres),
            website: input.website.clone(),
            seeking_venue: input.seeking_venue,
            seeking_description: input.seeking_description.clone(),
        }
    }
}

// Read-side projections consumed by the page templates.

#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistRef {
    pub id: i64,
    pub name: String,
}

/// A show as rendered on its venue's page.
#[derive(Debug, Clone, Serialize)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

/// A show as rendered on its artist's page.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// One row of the show ledger.
#[derive(Debug, Clone, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchMatch>,
}
