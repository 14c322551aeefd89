use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use showbill_core::directory::{artists, search, shows, venues};
use showbill_core::storage::InMemoryStorage;
use showbill_core::{
    Artist, ArtistInput, DirectoryError, Show, ShowInput, Storage, Venue, VenueInput,
};

fn eval_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 15)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn fmt(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn venue_input(name: &str, city: &str, state: &str) -> VenueInput {
    VenueInput {
        name: name.into(),
        city: city.into(),
        state: state.into(),
        address: "123 Main St".into(),
        phone: "555-0100".into(),
        genres: vec!["Jazz".into(), "Folk".into()],
        facebook_link: "https://facebook.com/example".into(),
        image_link: "https://example.com/venue.png".into(),
        website: "https://example.com".into(),
        seeking_talent: false,
        seeking_description: "Not currently seeking talent".into(),
    }
}

fn artist_input(name: &str) -> ArtistInput {
    ArtistInput {
        name: name.into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        phone: "555-0101".into(),
        genres: vec!["Rock n Roll".into()],
        facebook_link: "https://facebook.com/example".into(),
        image_link: "https://example.com/artist.png".into(),
        website: "https://example.com".into(),
        seeking_venue: true,
        seeking_description: "Looking for venues".into(),
    }
}

async fn book_show(
    storage: &dyn Storage,
    artist_id: i64,
    venue_id: i64,
    start: NaiveDateTime,
) -> Result<i64> {
    let id = shows::create(
        storage,
        &ShowInput {
            artist_id,
            venue_id,
            start_time: fmt(start),
        },
    )
    .await?;
    Ok(id)
}

#[tokio::test]
async fn created_venue_round_trips_its_genre_list() -> Result<()> {
    let storage = InMemoryStorage::new();
    let input = venue_input("The Musical Hop", "San Francisco", "CA");
    let id = venues::create(&storage, &input).await?;

    let detail = venues::detail(&storage, id, eval_instant()).await?;
    assert_eq!(detail.name, "The Musical Hop");
    assert_eq!(detail.genres, input.genres);
    Ok(())
}

#[tokio::test]
async fn venue_creation_rejects_missing_required_fields() -> Result<()> {
    let storage = InMemoryStorage::new();

    let mut input = venue_input("The Musical Hop", "San Francisco", "CA");
    input.phone = "".into();
    let err = venues::create(&storage, &input).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));

    let mut input = venue_input("The Musical Hop", "San Francisco", "CA");
    input.genres.clear();
    let err = venues::create(&storage, &input).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));

    assert!(storage.all_venues().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn future_shows_are_upcoming_on_both_sides() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;

    book_show(&storage, artist_id, venue_id, now + Duration::days(7)).await?;
    book_show(&storage, artist_id, venue_id, now - Duration::days(7)).await?;

    let venue = venues::detail(&storage, venue_id, now).await?;
    assert_eq!(venue.upcoming_shows_count, 1);
    assert_eq!(venue.past_shows_count, 1);
    assert_eq!(venue.upcoming_shows[0].artist_name, "Guns N Petals");
    assert_eq!(venue.past_shows[0].artist_id, artist_id);

    let artist = artists::detail(&storage, artist_id, now).await?;
    assert_eq!(artist.upcoming_shows_count, 1);
    assert_eq!(artist.past_shows_count, 1);
    assert_eq!(artist.upcoming_shows[0].venue_name, "The Musical Hop");
    Ok(())
}

#[tokio::test]
async fn show_starting_exactly_now_counts_as_upcoming() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;
    book_show(&storage, artist_id, venue_id, now).await?;

    let venue = venues::detail(&storage, venue_id, now).await?;
    assert_eq!(venue.upcoming_shows_count, 1);
    assert_eq!(venue.past_shows_count, 0);
    Ok(())
}

#[tokio::test]
async fn deleting_a_venue_cascades_to_its_shows() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;
    let show_id = book_show(&storage, artist_id, venue_id, now + Duration::days(1)).await?;

    venues::delete(&storage, venue_id).await?;

    assert!(storage.get_show(show_id).await?.is_none());
    assert!(shows::list(&storage).await?.is_empty());
    let err = venues::detail(&storage, venue_id, now).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn deleting_an_artist_cascades_to_its_shows() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;
    let show_id = book_show(&storage, artist_id, venue_id, now + Duration::days(1)).await?;

    artists::delete(&storage, artist_id).await?;

    assert!(storage.get_show(show_id).await?.is_none());
    let err = artists::detail(&storage, artist_id, now).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn venue_search_matches_substrings() -> Result<()> {
    let storage = InMemoryStorage::new();
    venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    venues::create(
        &storage,
        &venue_input("Park Square Live Music & Coffee", "San Francisco", "CA"),
    )
    .await?;

    let results = search::venues(&storage, "Hop", eval_instant()).await?;
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].name, "The Musical Hop");

    let results = search::venues(&storage, "Music", eval_instant()).await?;
    assert_eq!(results.count, 2);

    // Empty term is a substring of everything.
    let results = search::venues(&storage, "", eval_instant()).await?;
    assert_eq!(results.count, 2);
    Ok(())
}

#[tokio::test]
async fn artist_search_is_case_insensitive() -> Result<()> {
    let storage = InMemoryStorage::new();
    for name in ["Guns N Petals", "Matt Quevado", "The Wild Sax Band"] {
        artists::create(&storage, &artist_input(name)).await?;
    }

    let results = search::artists(&storage, "A", eval_instant()).await?;
    assert_eq!(results.count, 3);

    let results = search::artists(&storage, "band", eval_instant()).await?;
    assert_eq!(results.count, 1);
    assert_eq!(results.data[0].name, "The Wild Sax Band");
    Ok(())
}

#[tokio::test]
async fn search_counts_reflect_upcoming_shows_only() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;
    book_show(&storage, artist_id, venue_id, now + Duration::days(3)).await?;
    book_show(&storage, artist_id, venue_id, now - Duration::days(3)).await?;

    let results = search::venues(&storage, "Hop", now).await?;
    assert_eq!(results.data[0].num_upcoming_shows, 1);

    let results = search::artists(&storage, "Petals", now).await?;
    assert_eq!(results.data[0].num_upcoming_shows, 1);
    Ok(())
}

#[tokio::test]
async fn venue_listing_groups_by_exact_city_state_pair() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    venues::create(&storage, &venue_input("The Musical Hop", "Nashville", "TN")).await?;
    venues::create(&storage, &venue_input("Duke's", "Nashville", "GA")).await?;
    venues::create(&storage, &venue_input("The Dueling Pianos Bar", "Nashville", "TN")).await?;

    let groups = venues::list_grouped(&storage, now).await?;
    assert_eq!(groups.len(), 2);

    let tn = groups
        .iter()
        .find(|g| g.city == "Nashville" && g.state == "TN")
        .unwrap();
    assert_eq!(tn.venues.len(), 2);
    let ga = groups
        .iter()
        .find(|g| g.city == "Nashville" && g.state == "GA")
        .unwrap();
    assert_eq!(ga.venues.len(), 1);
    Ok(())
}

#[tokio::test]
async fn grouped_listing_carries_live_upcoming_counts() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;
    book_show(&storage, artist_id, venue_id, now + Duration::days(1)).await?;
    book_show(&storage, artist_id, venue_id, now + Duration::days(2)).await?;
    book_show(&storage, artist_id, venue_id, now - Duration::days(1)).await?;

    let groups = venues::list_grouped(&storage, now).await?;
    assert_eq!(groups[0].venues[0].num_upcoming_shows, 2);
    Ok(())
}

#[tokio::test]
async fn artist_listing_is_a_flat_projection() -> Result<()> {
    let storage = InMemoryStorage::new();
    artists::create(&storage, &artist_input("Guns N Petals")).await?;
    artists::create(&storage, &artist_input("The Wild Sax Band")).await?;

    let listing = artists::list(&storage).await?;
    let names: Vec<&str> = listing.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Guns N Petals", "The Wild Sax Band"]);
    Ok(())
}

#[tokio::test]
async fn show_ledger_lists_in_id_order_with_names() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;
    let first = book_show(&storage, artist_id, venue_id, now + Duration::days(2)).await?;
    let second = book_show(&storage, artist_id, venue_id, now + Duration::days(1)).await?;
    assert!(first < second);

    let ledger = shows::list(&storage).await?;
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].venue_name, "The Musical Hop");
    assert_eq!(ledger[0].artist_name, "Guns N Petals");
    assert_eq!(ledger[0].start_time, fmt(now + Duration::days(2)));
    assert_eq!(ledger[1].start_time, fmt(now + Duration::days(1)));
    Ok(())
}

#[tokio::test]
async fn show_creation_requires_existing_parents() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;

    let err = shows::create(
        &storage,
        &ShowInput {
            artist_id: 9999,
            venue_id,
            start_time: fmt(now + Duration::days(1)),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
    assert!(storage.all_shows().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn show_creation_rejects_malformed_timestamps() -> Result<()> {
    let storage = InMemoryStorage::new();
    let venue_id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    let artist_id = artists::create(&storage, &artist_input("Guns N Petals")).await?;

    let err = shows::create(
        &storage,
        &ShowInput {
            artist_id,
            venue_id,
            start_time: "next Friday at 8".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DirectoryError::Validation(_)));
    assert!(storage.all_shows().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_overwrites_the_full_record() -> Result<()> {
    let storage = InMemoryStorage::new();
    let now = eval_instant();
    let id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;

    let mut changed = venue_input("The Musical Hop Annex", "Oakland", "CA");
    changed.genres = vec!["Blues".into()];
    changed.seeking_talent = true;
    venues::update(&storage, id, &changed).await?;

    let detail = venues::detail(&storage, id, now).await?;
    assert_eq!(detail.name, "The Musical Hop Annex");
    assert_eq!(detail.city, "Oakland");
    assert_eq!(detail.genres, vec!["Blues".to_string()]);
    assert!(detail.seeking_talent);

    let err = venues::update(&storage, 9999, &changed).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
    Ok(())
}

type CoreResult<T> = showbill_core::Result<T>;

/// In-memory backend that starts failing every write on demand, so tests can
/// seed records first and then watch mutation errors surface.
struct FailingWrites {
    inner: InMemoryStorage,
    fail: AtomicBool,
}

impl FailingWrites {
    fn new() -> Self {
        Self {
            inner: InMemoryStorage::new(),
            fail: AtomicBool::new(false),
        }
    }

    fn start_failing(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> CoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DirectoryError::Database {
                message: "disk I/O error".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FailingWrites {
    async fn create_venue(&self, venue: &mut Venue) -> CoreResult<()> {
        self.check()?;
        self.inner.create_venue(venue).await
    }

    async fn get_venue(&self, id: i64) -> CoreResult<Option<Venue>> {
        self.inner.get_venue(id).await
    }

    async fn update_venue(&self, venue: &Venue) -> CoreResult<()> {
        self.check()?;
        self.inner.update_venue(venue).await
    }

    async fn delete_venue(&self, id: i64) -> CoreResult<()> {
        self.check()?;
        self.inner.delete_venue(id).await
    }

    async fn all_venues(&self) -> CoreResult<Vec<Venue>> {
        self.inner.all_venues().await
    }

    async fn search_venues(&self, term: &str) -> CoreResult<Vec<Venue>> {
        self.inner.search_venues(term).await
    }

    async fn create_artist(&self, artist: &mut Artist) -> CoreResult<()> {
        self.check()?;
        self.inner.create_artist(artist).await
    }

    async fn get_artist(&self, id: i64) -> CoreResult<Option<Artist>> {
        self.inner.get_artist(id).await
    }

    async fn update_artist(&self, artist: &Artist) -> CoreResult<()> {
        self.check()?;
        self.inner.update_artist(artist).await
    }

    async fn delete_artist(&self, id: i64) -> CoreResult<()> {
        self.check()?;
        self.inner.delete_artist(id).await
    }

    async fn all_artists(&self) -> CoreResult<Vec<Artist>> {
        self.inner.all_artists().await
    }

    async fn search_artists(&self, term: &str) -> CoreResult<Vec<Artist>> {
        self.inner.search_artists(term).await
    }

    async fn create_show(&self, show: &mut Show) -> CoreResult<()> {
        self.check()?;
        self.inner.create_show(show).await
    }

    async fn get_show(&self, id: i64) -> CoreResult<Option<Show>> {
        self.inner.get_show(id).await
    }

    async fn all_shows(&self) -> CoreResult<Vec<Show>> {
        self.inner.all_shows().await
    }

    async fn shows_for_venue(&self, venue_id: i64) -> CoreResult<Vec<Show>> {
        self.inner.shows_for_venue(venue_id).await
    }

    async fn shows_for_artist(&self, artist_id: i64) -> CoreResult<Vec<Show>> {
        self.inner.shows_for_artist(artist_id).await
    }

    async fn count_upcoming_shows_for_venue(
        &self,
        venue_id: i64,
        now: NaiveDateTime,
    ) -> CoreResult<u32> {
        self.inner.count_upcoming_shows_for_venue(venue_id, now).await
    }

    async fn count_upcoming_shows_for_artist(
        &self,
        artist_id: i64,
        now: NaiveDateTime,
    ) -> CoreResult<u32> {
        self.inner.count_upcoming_shows_for_artist(artist_id, now).await
    }
}

#[tokio::test]
async fn storage_failure_during_update_surfaces_as_write_error() -> Result<()> {
    let storage = FailingWrites::new();
    let id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    storage.start_failing();

    let err = venues::update(&storage, id, &venue_input("The Annex", "Oakland", "CA"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Write { .. }));

    // Nothing was committed; the original record is intact.
    let detail = venues::detail(&storage, id, eval_instant()).await?;
    assert_eq!(detail.name, "The Musical Hop");
    assert_eq!(detail.city, "San Francisco");
    Ok(())
}

#[tokio::test]
async fn storage_failure_during_create_and_delete_surfaces_as_write_error() -> Result<()> {
    let storage = FailingWrites::new();
    let id = venues::create(&storage, &venue_input("The Musical Hop", "San Francisco", "CA")).await?;
    storage.start_failing();

    let err = venues::create(&storage, &venue_input("Park Square", "San Francisco", "CA"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Write { .. }));

    let err = venues::delete(&storage, id).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Write { .. }));
    assert!(storage.get_venue(id).await?.is_some());
    Ok(())
}
