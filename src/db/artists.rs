use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{decode_genres, encode_genres, name_matches, Repository};
use crate::error::Result;
use crate::models::{Artist, ArtistDetail, ArtistDraft, ArtistSummary, VenueAppearance};

const COLUMNS: &str = "id, name, city, state, phone, genres, image_link, facebook_link, \
                       website_link, seeking_venue, seeking_description";

pub struct Artists;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        phone: row.get(4)?,
        genres: decode_genres(row, 5)?,
        image_link: row.get(6)?,
        facebook_link: row.get(7)?,
        website_link: row.get(8)?,
        seeking_venue: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}

impl Repository for Artists {
    type Record = Artist;
    type Draft = ArtistDraft;

    fn create(conn: &Connection, draft: &ArtistDraft) -> Result<i64> {
        conn.execute(
            "INSERT INTO artists (name, city, state, phone, genres, image_link, facebook_link,
                                  website_link, seeking_venue, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                draft.name,
                draft.city,
                draft.state,
                draft.phone,
                encode_genres(&draft.genres)?,
                draft.image_link,
                draft.facebook_link,
                draft.website_link,
                draft.seeking_venue,
                draft.seeking_description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get(conn: &Connection, id: i64) -> Result<Option<Artist>> {
        let artist = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM artists WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()?;
        Ok(artist)
    }

    fn list(conn: &Connection) -> Result<Vec<Artist>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM artists ORDER BY id"))?;
        let rows = stmt.query_map([], from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn update(conn: &Connection, id: i64, draft: &ArtistDraft) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE artists SET
               name = ?2, city = ?3, state = ?4, phone = ?5, genres = ?6,
               image_link = ?7, facebook_link = ?8, website_link = ?9,
               seeking_venue = ?10, seeking_description = ?11
             WHERE id = ?1",
            params![
                id,
                draft.name,
                draft.city,
                draft.state,
                draft.phone,
                encode_genres(&draft.genres)?,
                draft.image_link,
                draft.facebook_link,
                draft.website_link,
                draft.seeking_venue,
                draft.seeking_description,
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

impl Artists {
    pub fn search(conn: &Connection, term: &str, now: NaiveDateTime) -> Result<Vec<ArtistSummary>> {
        let mut stmt = conn.prepare(
            "SELECT a.id, a.name,
                    (SELECT COUNT(*) FROM shows s WHERE s.artist_id = a.id AND s.start_time > ?1)
             FROM artists a
             ORDER BY a.id",
        )?;
        let rows = stmt.query_map(params![now], |row| {
            Ok(ArtistSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                num_upcoming_shows: row.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            let summary = row?;
            if name_matches(&summary.name, term) {
                out.push(summary);
            }
        }
        Ok(out)
    }

    pub fn detail(conn: &Connection, id: i64, now: NaiveDateTime) -> Result<Option<ArtistDetail>> {
        let Some(artist) = Self::get(conn, id)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT s.venue_id, v.name, v.image_link, s.start_time
             FROM shows s JOIN venues v ON v.id = s.venue_id
             WHERE s.artist_id = ?1
             ORDER BY s.start_time",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok(VenueAppearance {
                venue_id: row.get(0)?,
                venue_name: row.get(1)?,
                venue_image_link: row.get(2)?,
                start_time: row.get(3)?,
            })
        })?;

        let mut shows = Vec::new();
        for row in rows {
            shows.push(row?);
        }
        Ok(Some(ArtistDetail::new(artist, shows, now)))
    }
}
