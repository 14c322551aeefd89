use axum::{
    extract::{Path, RawForm, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::{Local, NaiveDateTime};
use tracing::error;

use showbill_core::directory::{artists, search, shows, venues};
use showbill_core::DirectoryError;

use crate::forms::{self, FormPairs, SearchForm};
use crate::state::AppState;
use crate::templates::*;

/// Evaluation instant for upcoming/past classification.
fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn failure_page(err: &DirectoryError) -> Response {
    match err {
        DirectoryError::NotFound(what) => {
            error!("not found: {what}");
            (StatusCode::NOT_FOUND, NotFoundTemplate).into_response()
        }
        other => {
            error!("request failed: {other}");
            (StatusCode::INTERNAL_SERVER_ERROR, ServerErrorTemplate).into_response()
        }
    }
}

pub async fn home() -> HomeTemplate {
    HomeTemplate { message: None }
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate).into_response()
}

//  Venues
//  ----------------------------------------------------------------

pub async fn venues_page(State(state): State<AppState>) -> Response {
    match venues::list_grouped(state.storage.as_ref(), now()).await {
        Ok(areas) => VenuesTemplate { areas }.into_response(),
        Err(err) => failure_page(&err),
    }
}

pub async fn search_venues_page(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Response {
    match search::venues(state.storage.as_ref(), &form.search_term, now()).await {
        Ok(results) => VenueSearchTemplate {
            search_term: form.search_term,
            results,
        }
        .into_response(),
        Err(err) => failure_page(&err),
    }
}

pub async fn venue_page(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match venues::detail(state.storage.as_ref(), id, now()).await {
        Ok(venue) => VenuePageTemplate { venue }.into_response(),
        Err(err) => failure_page(&err),
    }
}

pub async fn new_venue_form() -> NewVenueTemplate {
    NewVenueTemplate {
        genres: genre_choices(&[]),
    }
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Response {
    let pairs = FormPairs::parse(&body);
    let name = pairs.first("name").unwrap_or_default().to_string();

    let outcome = match forms::venue_input(&pairs) {
        Ok(input) => venues::create(state.storage.as_ref(), &input).await.map(|_| ()),
        Err(err) => Err(err),
    };
    let message = match outcome {
        Ok(()) => format!("Venue {name} was successfully listed!"),
        Err(err) => {
            error!("venue listing failed: {err}");
            format!("An error occurred. Venue {name} could not be listed.")
        }
    };
    HomeTemplate {
        message: Some(message),
    }
    .into_response()
}

pub async fn edit_venue_form(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match venues::detail(state.storage.as_ref(), id, now()).await {
        Ok(venue) => {
            let genres = genre_choices(&venue.genres);
            EditVenueTemplate { venue, genres }.into_response()
        }
        Err(err) => failure_page(&err),
    }
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    RawForm(body): RawForm,
) -> Response {
    let pairs = FormPairs::parse(&body);
    let name = pairs.first("name").unwrap_or_default().to_string();

    let outcome = match forms::venue_input(&pairs) {
        Ok(input) => venues::update(state.storage.as_ref(), id, &input).await,
        Err(err) => Err(err),
    };
    let message = match outcome {
        Ok(()) => format!("Venue {name} was successfully updated!"),
        Err(err @ DirectoryError::NotFound(_)) => return failure_page(&err),
        Err(err) => {
            error!("venue update failed: {err}");
            format!("An error occurred. Venue {name} could not be updated.")
        }
    };
    HomeTemplate {
        message: Some(message),
    }
    .into_response()
}

pub async fn delete_venue_submission(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match venues::delete(state.storage.as_ref(), id).await {
        Ok(()) => HomeTemplate {
            message: Some("The venue was successfully deleted!".into()),
        }
        .into_response(),
        Err(err @ DirectoryError::NotFound(_)) => failure_page(&err),
        Err(err) => {
            error!("venue delete failed: {err}");
            HomeTemplate {
                message: Some("An error occurred. The venue could not be deleted.".into()),
            }
            .into_response()
        }
    }
}

//  Artists
//  ----------------------------------------------------------------

pub async fn artists_page(State(state): State<AppState>) -> Response {
    match artists::list(state.storage.as_ref()).await {
        Ok(artists) => ArtistsTemplate { artists }.into_response(),
        Err(err) => failure_page(&err),
    }
}

pub async fn search_artists_page(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Response {
    match search::artists(state.storage.as_ref(), &form.search_term, now()).await {
        Ok(results) => ArtistSearchTemplate {
            search_term: form.search_term,
            results,
        }
        .into_response(),
        Err(err) => failure_page(&err),
    }
}

pub async fn artist_page(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match artists::detail(state.storage.as_ref(), id, now()).await {
        Ok(artist) => ArtistPageTemplate { artist }.into_response(),
        Err(err) => failure_page(&err),
    }
}

pub async fn new_artist_form() -> NewArtistTemplate {
    NewArtistTemplate {
        genres: genre_choices(&[]),
    }
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Response {
    let pairs = FormPairs::parse(&body);
    let name = pairs.first("name").unwrap_or_default().to_string();

    let outcome = match forms::artist_input(&pairs) {
        Ok(input) => artists::create(state.storage.as_ref(), &input).await.map(|_| ()),
        Err(err) => Err(err),
    };
    let message = match outcome {
        Ok(()) => format!("Artist {name} was successfully listed!"),
        Err(err) => {
            error!("artist listing failed: {err}");
            format!("An error occurred. Artist {name} could not be listed.")
        }
    };
    HomeTemplate {
        message: Some(message),
    }
    .into_response()
}

pub async fn edit_artist_form(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match artists::detail(state.storage.as_ref(), id, now()).await {
        Ok(artist) => {
            let genres = genre_choices(&artist.genres);
            EditArtistTemplate { artist, genres }.into_response()
        }
        Err(err) => failure_page(&err),
    }
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    RawForm(body): RawForm,
) -> Response {
    let pairs = FormPairs::parse(&body);
    let name = pairs.first("name").unwrap_or_default().to_string();

    let outcome = match forms::artist_input(&pairs) {
        Ok(input) => artists::update(state.storage.as_ref(), id, &input).await,
        Err(err) => Err(err),
    };
    let message = match outcome {
        Ok(()) => format!("Artist {name} was successfully updated!"),
        Err(err @ DirectoryError::NotFound(_)) => return failure_page(&err),
        Err(err) => {
            error!("artist update failed: {err}");
            format!("An error occurred. Artist {name} could not be updated.")
        }
    };
    HomeTemplate {
        message: Some(message),
    }
    .into_response()
}

pub async fn delete_artist_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    match artists::delete(state.storage.as_ref(), id).await {
        Ok(()) => HomeTemplate {
            message: Some("The artist was successfully deleted!".into()),
        }
        .into_response(),
        Err(err @ DirectoryError::NotFound(_)) => failure_page(&err),
        Err(err) => {
            error!("artist delete failed: {err}");
            HomeTemplate {
                message: Some("An error occurred. The artist could not be deleted.".into()),
            }
            .into_response()
        }
    }
}

//  Shows
//  ----------------------------------------------------------------

pub async fn shows_page(State(state): State<AppState>) -> Response {
    match shows::list(state.storage.as_ref()).await {
        Ok(shows) => ShowsTemplate { shows }.into_response(),
        Err(err) => failure_page(&err),
    }
}

pub async fn new_show_form() -> NewShowTemplate {
    NewShowTemplate
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Response {
    let pairs = FormPairs::parse(&body);
    let outcome = match forms::show_input(&pairs) {
        Ok(input) => shows::create(state.storage.as_ref(), &input).await.map(|_| ()),
        Err(err) => Err(err),
    };
    let message = match outcome {
        Ok(()) => "Show was successfully listed!".to_string(),
        Err(err) => {
            error!("show listing failed: {err}");
            "An error occurred. Show could not be listed.".to_string()
        }
    };
    HomeTemplate {
        message: Some(message),
    }
    .into_response()
}
