//! Typed decoding of urlencoded form bodies.
//!
//! Each operation gets a statically validated schema: missing required keys
//! are rejected before anything touches storage. `genres` arrives as a
//! repeated key; the seeking flag is a present-or-absent checkbox.

use serde::Deserialize;
use showbill_core::{ArtistInput, DirectoryError, Result, ShowInput, VenueInput};
use url::form_urlencoded;

/// Search submissions carry a single field and decode directly.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

pub struct FormPairs(Vec<(String, String)>);

impl FormPairs {
    pub fn parse(body: &[u8]) -> Self {
        Self(form_urlencoded::parse(body).into_owned().collect())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.first(key)
            .map(str::to_string)
            .ok_or_else(|| DirectoryError::Validation(format!("missing form field '{key}'")))
    }

    fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Checkbox semantics: the flag is set iff the key was submitted at all.
    fn checkbox(&self, key: &str) -> bool {
        self.first(key).is_some()
    }

    fn required_id(&self, key: &str) -> Result<i64> {
        let raw = self.required(key)?;
        raw.parse().map_err(|_| {
            DirectoryError::Validation(format!("form field '{key}' is not a valid id: '{raw}'"))
        })
    }
}

pub fn venue_input(pairs: &FormPairs) -> Result<VenueInput> {
    Ok(VenueInput {
        name: pairs.required("name")?,
        city: pairs.required("city")?,
        state: pairs.required("state")?,
        address: pairs.required("address")?,
        phone: pairs.required("phone")?,
        genres: pairs.all("genres"),
        facebook_link: pairs.required("facebook_link")?,
        image_link: pairs.required("image_link")?,
        website: pairs.required("website")?,
        seeking_talent: pairs.checkbox("seeking_talent"),
        seeking_description: pairs.required("seeking_description")?,
    })
}

pub fn artist_input(pairs: &FormPairs) -> Result<ArtistInput> {
    Ok(ArtistInput {
        name: pairs.required("name")?,
        city: pairs.required("city")?,
        state: pairs.required("state")?,
        phone: pairs.required("phone")?,
        genres: pairs.all("genres"),
        facebook_link: pairs.required("facebook_link")?,
        image_link: pairs.required("image_link")?,
        website: pairs.required("website")?,
        seeking_venue: pairs.checkbox("seeking_venue"),
        seeking_description: pairs.required("seeking_description")?,
    })
}

pub fn show_input(pairs: &FormPairs) -> Result<ShowInput> {
    Ok(ShowInput {
        artist_id: pairs.required_id("artist_id")?,
        venue_id: pairs.required_id("venue_id")?,
        start_time: pairs.required("start_time")?,
    })
}
