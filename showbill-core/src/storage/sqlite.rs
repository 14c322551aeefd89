use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::traits::Storage;
use crate::common::error::{DirectoryError, Result};
use crate::domain::*;
use async_trait::async_trait;

/// SQLite-backed storage. One connection behind a mutex; each mutating call
/// runs inside its own transaction and the lock is never held across an
/// await point.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link, \
     genres, website, seeking_talent, seeking_description";
const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, facebook_link, \
     genres, website, seeking_venue, seeking_description";

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS venues(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            address TEXT NOT NULL,
            phone TEXT NOT NULL,
            image_link TEXT NOT NULL,
            facebook_link TEXT NOT NULL,
            genres TEXT NOT NULL,
            website TEXT NOT NULL,
            seeking_talent INTEGER NOT NULL DEFAULT 0,
            seeking_description TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS artists(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            phone TEXT NOT NULL,
            image_link TEXT NOT NULL,
            facebook_link TEXT NOT NULL,
            genres TEXT NOT NULL,
            website TEXT NOT NULL,
            seeking_venue INTEGER NOT NULL DEFAULT 0,
            seeking_description TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS shows(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time TEXT NOT NULL,
            venue_id INTEGER NOT NULL REFERENCES venues(id) ON DELETE CASCADE,
            artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE
        );",
    )
}

// Search terms are literal substrings; % and _ must not act as LIKE
// wildcards. Escaped here, declared via the ESCAPE clause in the queries.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn row_to_venue(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        image_link: row.get(6)?,
        facebook_link: row.get(7)?,
        genres: row.get(8)?,
        website: row.get(9)?,
        seeking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

fn row_to_artist(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        phone: row.get(4)?,
        image_link: row.get(5)?,
        facebook_link: row.get(6)?,
        genres: row.get(7)?,
        website: row.get(8)?,
        seeking_venue: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}

// start_time is stored in SHOW_TIME_FORMAT; lexicographic comparison on the
// column equals chronological comparison.
fn row_to_show(row: &Row<'_>) -> rusqlite::Result<Show> {
    let start: String = row.get(1)?;
    let start_time = NaiveDateTime::parse_from_str(&start, SHOW_TIME_FORMAT).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(Show {
        id: Some(row.get(0)?),
        start_time,
        venue_id: row.get(2)?,
        artist_id: row.get(3)?,
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_venue(&self, venue: &mut Venue) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO venues (name, city, state, address, phone, image_link, facebook_link, \
             genres, website, seeking_talent, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.image_link,
                venue.facebook_link,
                venue.genres,
                venue.website,
                venue.seeking_talent,
                venue.seeking_description,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        venue.id = Some(id);

        debug!("created venue '{}' with id {}", venue.name, id);
        Ok(())
    }

    async fn get_venue(&self, id: i64) -> Result<Option<Venue>> {
        let conn = self.conn.lock().unwrap();
        let venue = conn
            .query_row(
                &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
                params![id],
                row_to_venue,
            )
            .optional()?;
        Ok(venue)
    }

    async fn update_venue(&self, venue: &Venue) -> Result<()> {
        let id = venue
            .id
            .ok_or_else(|| DirectoryError::Validation("cannot update a venue without an id".into()))?;

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE venues SET name = ?2, city = ?3, state = ?4, address = ?5, phone = ?6, \
             image_link = ?7, facebook_link = ?8, genres = ?9, website = ?10, \
             seeking_talent = ?11, seeking_description = ?12
             WHERE id = ?1",
            params![
                id,
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.image_link,
                venue.facebook_link,
                venue.genres,
                venue.website,
                venue.seeking_talent,
                venue.seeking_description,
            ],
        )?;
        if changed == 0 {
            return Err(DirectoryError::NotFound(format!("venue {id}")));
        }
        tx.commit()?;

        debug!("updated venue {}", id);
        Ok(())
    }

    async fn delete_venue(&self, id: i64) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        // Cascade expressed at the application level; the schema's ON DELETE
        // CASCADE stays as a backstop.
        tx.execute("DELETE FROM shows WHERE venue_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM venues WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DirectoryError::NotFound(format!("venue {id}")));
        }
        tx.commit()?;

        debug!("deleted venue {} and its shows", id);
        Ok(())
    }

    async fn all_venues(&self) -> Result<Vec<Venue>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare(&format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_venue)?;
        let mut venues = Vec::new();
        for row in rows {
            venues.push(row?);
        }
        Ok(venues)
    }

    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues \
             WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\' ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![escape_like(term)], row_to_venue)?;
        let mut venues = Vec::new();
        for row in rows {
            venues.push(row?);
        }
        Ok(venues)
    }

    async fn create_artist(&self, artist: &mut Artist) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO artists (name, city, state, phone, image_link, facebook_link, \
             genres, website, seeking_venue, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.image_link,
                artist.facebook_link,
                artist.genres,
                artist.website,
                artist.seeking_venue,
                artist.seeking_description,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        artist.id = Some(id);

        debug!("created artist '{}' with id {}", artist.name, id);
        Ok(())
    }

    async fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        let conn = self.conn.lock().unwrap();
        let artist = conn
            .query_row(
                &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1"),
                params![id],
                row_to_artist,
            )
            .optional()?;
        Ok(artist)
    }

    async fn update_artist(&self, artist: &Artist) -> Result<()> {
        let id = artist
            .id
            .ok_or_else(|| DirectoryError::Validation("cannot update an artist without an id".into()))?;

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE artists SET name = ?2, city = ?3, state = ?4, phone = ?5, \
             image_link = ?6, facebook_link = ?7, genres = ?8, website = ?9, \
             seeking_venue = ?10, seeking_description = ?11
             WHERE id = ?1",
            params![
                id,
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.image_link,
                artist.facebook_link,
                artist.genres,
                artist.website,
                artist.seeking_venue,
                artist.seeking_description,
            ],
        )?;
        if changed == 0 {
            return Err(DirectoryError::NotFound(format!("artist {id}")));
        }
        tx.commit()?;

        debug!("updated artist {}", id);
        Ok(())
    }

    async fn delete_artist(&self, id: i64) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM shows WHERE artist_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DirectoryError::NotFound(format!("artist {id}")));
        }
        tx.commit()?;

        debug!("deleted artist {} and its shows", id);
        Ok(())
    }

    async fn all_artists(&self) -> Result<Vec<Artist>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare(&format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_artist)?;
        let mut artists = Vec::new();
        for row in rows {
            artists.push(row?);
        }
        Ok(artists)
    }

    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artists \
             WHERE name LIKE '%' || ?1 || '%' ESCAPE '\\' ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![escape_like(term)], row_to_artist)?;
        let mut artists = Vec::new();
        for row in rows {
            artists.push(row?);
        }
        Ok(artists)
    }

    async fn create_show(&self, show: &mut Show) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO shows (start_time, venue_id, artist_id) VALUES (?1, ?2, ?3)",
            params![
                format_show_time(show.start_time),
                show.venue_id,
                show.artist_id,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        show.id = Some(id);

        debug!(
            "created show {} (venue {}, artist {})",
            id, show.venue_id, show.artist_id
        );
        Ok(())
    }

    async fn get_show(&self, id: i64) -> Result<Option<Show>> {
        let conn = self.conn.lock().unwrap();
        let show = conn
            .query_row(
                "SELECT id, start_time, venue_id, artist_id FROM shows WHERE id = ?1",
                params![id],
                row_to_show,
            )
            .optional()?;
        Ok(show)
    }

    async fn all_shows(&self) -> Result<Vec<Show>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, start_time, venue_id, artist_id FROM shows ORDER BY id")?;
        let rows = stmt.query_map([], row_to_show)?;
        let mut shows = Vec::new();
        for row in rows {
            shows.push(row?);
        }
        Ok(shows)
    }

    async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<Show>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, start_time, venue_id, artist_id FROM shows WHERE venue_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![venue_id], row_to_show)?;
        let mut shows = Vec::new();
        for row in rows {
            shows.push(row?);
        }
        Ok(shows)
    }

    async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<Show>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, start_time, venue_id, artist_id FROM shows WHERE artist_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![artist_id], row_to_show)?;
        let mut shows = Vec::new();
        for row in rows {
            shows.push(row?);
        }
        Ok(shows)
    }

    async fn count_upcoming_shows_for_venue(
        &self,
        venue_id: i64,
        now: NaiveDateTime,
    ) -> Result<u32> {
        let conn = self.conn.lock().unwrap();
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM shows WHERE venue_id = ?1 AND start_time >= ?2",
            params![venue_id, format_show_time(now)],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    async fn count_upcoming_shows_for_artist(
        &self,
        artist_id: i64,
        now: NaiveDateTime,
    ) -> Result<u32> {
        let conn = self.conn.lock().unwrap();
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM shows WHERE artist_id = ?1 AND start_time >= ?2",
            params![artist_id, format_show_time(now)],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
