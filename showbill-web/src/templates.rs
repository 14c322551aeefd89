use askama::Template;

use showbill_core::{
    ArtistDetail, ArtistRef, CityGroup, SearchResults, ShowListing, VenueDetail, GENRE_CHOICES,
};

/// One entry of the genre multi-select, with its current selection state.
pub struct GenreChoice {
    pub name: &'static str,
    pub selected: bool,
}

pub fn genre_choices(selected: &[String]) -> Vec<GenreChoice> {
    GENRE_CHOICES
        .iter()
        .map(|&name| GenreChoice {
            name,
            selected: selected.iter().any(|s| s == name),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "venues.html")]
pub struct VenuesTemplate {
    pub areas: Vec<CityGroup>,
}

#[derive(Template)]
#[template(path = "search_venues.html")]
pub struct VenueSearchTemplate {
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "venue.html")]
pub struct VenuePageTemplate {
    pub venue: VenueDetail,
}

#[derive(Template)]
#[template(path = "new_venue.html")]
pub struct NewVenueTemplate {
    pub genres: Vec<GenreChoice>,
}

#[derive(Template)]
#[template(path = "edit_venue.html")]
pub struct EditVenueTemplate {
    pub venue: VenueDetail,
    pub genres: Vec<GenreChoice>,
}

#[derive(Template)]
#[template(path = "artists.html")]
pub struct ArtistsTemplate {
    pub artists: Vec<ArtistRef>,
}

#[derive(Template)]
#[template(path = "search_artists.html")]
pub struct ArtistSearchTemplate {
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "artist.html")]
pub struct ArtistPageTemplate {
    pub artist: ArtistDetail,
}

#[derive(Template)]
#[template(path = "new_artist.html")]
pub struct NewArtistTemplate {
    pub genres: Vec<GenreChoice>,
}

#[derive(Template)]
#[template(path = "edit_artist.html")]
pub struct EditArtistTemplate {
    pub artist: ArtistDetail,
    pub genres: Vec<GenreChoice>,
}

#[derive(Template)]
#[template(path = "shows.html")]
pub struct ShowsTemplate {
    pub shows: Vec<ShowListing>,
}

#[derive(Template)]
#[template(path = "new_show.html")]
pub struct NewShowTemplate;

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "500.html")]
pub struct ServerErrorTemplate;
