use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Repository;
use crate::error::Result;
use crate::models::{Show, ShowDraft, ShowListing};

pub struct Shows;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Show> {
    Ok(Show {
        id: row.get(0)?,
        venue_id: row.get(1)?,
        artist_id: row.get(2)?,
        start_time: row.get(3)?,
    })
}

impl Repository for Shows {
    type Record = Show;
    type Draft = ShowDraft;

    fn create(conn: &Connection, draft: &ShowDraft) -> Result<i64> {
        conn.execute(
            "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
            params![draft.venue_id, draft.artist_id, draft.start_time],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get(conn: &Connection, id: i64) -> Result<Option<Show>> {
        let show = conn
            .query_row(
                "SELECT id, venue_id, artist_id, start_time FROM shows WHERE id = ?1",
                params![id],
                from_row,
            )
            .optional()?;
        Ok(show)
    }

    fn list(conn: &Connection) -> Result<Vec<Show>> {
        let mut stmt = conn.prepare(
            "SELECT id, venue_id, artist_id, start_time FROM shows ORDER BY start_time, id",
        )?;
        let rows = stmt.query_map([], from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn update(conn: &Connection, id: i64, draft: &ShowDraft) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE shows SET venue_id = ?2, artist_id = ?3, start_time = ?4 WHERE id = ?1",
            params![id, draft.venue_id, draft.artist_id, draft.start_time],
        )?;
        Ok(changed > 0)
    }

    fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn.execute("DELETE FROM shows WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

impl Shows {
    /// Every show with the venue and artist fields the listing page needs.
    pub fn listings(conn: &Connection) -> Result<Vec<ShowListing>> {
        let mut stmt = conn.prepare(
            "SELECT v.id, v.name, a.id, a.name, a.image_link, s.start_time
             FROM shows s
             JOIN venues v ON v.id = s.venue_id
             JOIN artists a ON a.id = s.artist_id
             ORDER BY s.start_time, s.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ShowListing {
                venue_id: row.get(0)?,
                venue_name: row.get(1)?,
                artist_id: row.get(2)?,
                artist_name: row.get(3)?,
                artist_image_link: row.get(4)?,
                start_time: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
