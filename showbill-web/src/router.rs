use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    artist_page, artists_page, create_artist_submission, create_show_submission,
    create_venue_submission, delete_artist_submission, delete_venue_submission, edit_artist_form,
    edit_artist_submission, edit_venue_form, edit_venue_submission, home, new_artist_form,
    new_show_form, new_venue_form, not_found, search_artists_page, search_venues_page, shows_page,
    venue_page, venues_page,
};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/venues", get(venues_page))
        .route("/venues/search", post(search_venues_page))
        .route("/venues/create", get(new_venue_form).post(create_venue_submission))
        .route("/venues/:id", get(venue_page))
        .route("/venues/:id/edit", get(edit_venue_form).post(edit_venue_submission))
        .route("/venues/:id/delete", post(delete_venue_submission))
        .route("/artists", get(artists_page))
        .route("/artists/search", post(search_artists_page))
        .route("/artists/create", get(new_artist_form).post(create_artist_submission))
        .route("/artists/:id", get(artist_page))
        .route("/artists/:id/edit", get(edit_artist_form).post(edit_artist_submission))
        .route("/artists/:id/delete", post(delete_artist_submission))
        .route("/shows", get(shows_page))
        .route("/shows/create", get(new_show_form).post(create_show_submission))
        .fallback(not_found)
        .with_state(state)
}
