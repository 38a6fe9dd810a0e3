use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{decode_genres, encode_genres, name_matches, Repository};
use crate::error::Result;
use crate::models::{ArtistAppearance, CityArea, Venue, VenueDetail, VenueDraft, VenueSummary};

const COLUMNS: &str = "id, name, city, state, address, phone, genres, image_link, \
                       facebook_link, website_link, seeking_talent, seeking_description";

const SUMMARY_QUERY: &str = "
    SELECT v.id, v.name, v.city, v.state,
           (SELECT COUNT(*) FROM shows s WHERE s.venue_id = v.id AND s.start_time > ?1)
    FROM venues v
    ORDER BY v.city, v.state, v.id";

pub struct Venues;

/// A venue summary tagged with the area it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRow {
    pub city: String,
    pub state: String,
    pub summary: VenueSummary,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        genres: decode_genres(row, 6)?,
        image_link: row.get(7)?,
        facebook_link: row.get(8)?,
        website_link: row.get(9)?,
        seeking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

impl Repository for Venues {
    type Record = Venue;
    type Draft = VenueDraft;

    fn create(conn: &Connection, draft: &VenueDraft) -> Result<i64> {
        conn.execute(
            "INSERT INTO venues (name, city, state, address, phone, genres, image_link,
                                 facebook_link, website_link, seeking_talent, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                draft.name,
                draft.city,
                draft.state,
                draft.address,
                draft.phone,
                encode_genres(&draft.genres)?,
                draft.image_link,
                draft.facebook_link,
                draft.website_link,
                draft.seeking_talent,
                draft.seeking_description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get(conn: &Connection, id: i64) -> Result<Option<Venue>> {
        let venue = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM venues WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()?;
        Ok(venue)
    }

    fn list(conn: &Connection) -> Result<Vec<Venue>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM venues ORDER BY id"))?;
        let rows = stmt.query_map([], from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn update(conn: &Connection, id: i64, draft: &VenueDraft) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE venues SET
               name = ?2, city = ?3, state = ?4, address = ?5, phone = ?6, genres = ?7,
               image_link = ?8, facebook_link = ?9, website_link = ?10,
               seeking_talent = ?11, seeking_description = ?12
             WHERE id = ?1",
            params![
                id,
                draft.name,
                draft.city,
                draft.state,
                draft.address,
                draft.phone,
                encode_genres(&draft.genres)?,
                draft.image_link,
                draft.facebook_link,
                draft.website_link,
                draft.seeking_talent,
                draft.seeking_description,
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn.execute("DELETE FROM venues WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

impl Venues {
    fn area_rows(conn: &Connection, now: NaiveDateTime) -> Result<Vec<AreaRow>> {
        let mut stmt = conn.prepare(SUMMARY_QUERY)?;
        let rows = stmt.query_map(params![now], |row| {
            Ok(AreaRow {
                city: row.get(2)?,
                state: row.get(3)?,
                summary: VenueSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    num_upcoming_shows: row.get(4)?,
                },
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn grouped_by_area(conn: &Connection, now: NaiveDateTime) -> Result<Vec<CityArea>> {
        Ok(group_by_area(Self::area_rows(conn, now)?))
    }

    pub fn search(conn: &Connection, term: &str, now: NaiveDateTime) -> Result<Vec<VenueSummary>> {
        let mut matches: Vec<VenueSummary> = Self::area_rows(conn, now)?
            .into_iter()
            .map(|row| row.summary)
            .filter(|summary| name_matches(&summary.name, term))
            .collect();
        matches.sort_by_key(|summary| summary.id);
        Ok(matches)
    }

    pub fn detail(conn: &Connection, id: i64, now: NaiveDateTime) -> Result<Option<VenueDetail>> {
        let Some(venue) = Self::get(conn, id)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT s.artist_id, a.name, a.image_link, s.start_time
             FROM shows s JOIN artists a ON a.id = s.artist_id
             WHERE s.venue_id = ?1
             ORDER BY s.start_time",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok(ArtistAppearance {
                artist_id: row.get(0)?,
                artist_name: row.get(1)?,
                artist_image_link: row.get(2)?,
                start_time: row.get(3)?,
            })
        })?;

        let mut shows = Vec::new();
        for row in rows {
            shows.push(row?);
        }
        Ok(Some(VenueDetail::new(venue, shows, now)))
    }
}

/// Nests venues under one entry per (city, state), ordered by city then state.
pub fn group_by_area(mut rows: Vec<AreaRow>) -> Vec<CityArea> {
    rows.sort_by(|a, b| (&a.city, &a.state).cmp(&(&b.city, &b.state)));

    let mut areas: Vec<CityArea> = Vec::new();
    for row in rows {
        match areas.last_mut() {
            Some(area) if area.city == row.city && area.state == row.state => {
                area.venues.push(row.summary);
            }
            _ => areas.push(CityArea {
                city: row.city,
                state: row.state,
                venues: vec![row.summary],
            }),
        }
    }
    areas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::venue_draft;
    use crate::db::{Artists, Shows, Store};
    use crate::models::{ArtistDraft, ShowDraft};
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid time")
    }

    fn artist_draft(name: &str) -> ArtistDraft {
        ArtistDraft {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            image_link: Some(format!("https://img.example.com/{name}")),
            ..ArtistDraft::default()
        }
    }

    fn row(id: i64, city: &str, state: &str) -> AreaRow {
        AreaRow {
            city: city.to_string(),
            state: state.to_string(),
            summary: VenueSummary {
                id,
                name: format!("Venue {id}"),
                num_upcoming_shows: 0,
            },
        }
    }

    #[test]
    fn round_trips_every_field() {
        let store = Store::in_memory().expect("store");
        let draft = VenueDraft {
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: Some("123-123-1234".into()),
            genres: vec!["Jazz".into(), "Reggae".into(), "Folk".into()],
            image_link: Some("https://img.example.com/hop.jpg".into()),
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            website_link: Some("https://www.themusicalhop.com".into()),
            seeking_talent: true,
            seeking_description: Some("Looking for a local artist".into()),
        };

        let id = store
            .transaction(|tx| Venues::create(tx, &draft))
            .expect("create");
        let venue = store
            .read(|conn| Venues::get(conn, id))
            .expect("get")
            .expect("exists");

        assert_eq!(venue.id, id);
        assert_eq!(venue.name, draft.name);
        assert_eq!(venue.address, draft.address);
        assert_eq!(venue.phone, draft.phone);
        assert_eq!(venue.genres, draft.genres);
        assert_eq!(venue.facebook_link, draft.facebook_link);
        assert!(venue.seeking_talent);
        assert_eq!(venue.seeking_description, draft.seeking_description);
    }

    #[test]
    fn update_overwrites_all_fields() {
        let store = Store::in_memory().expect("store");
        let id = store
            .transaction(|tx| {
                let mut draft = venue_draft("Old Name", "Boise", "ID");
                draft.seeking_talent = true;
                draft.phone = Some("208-000-0000".into());
                Venues::create(tx, &draft)
            })
            .expect("create");

        let replacement = venue_draft("New Name", "Portland", "OR");
        let updated = store
            .transaction(|tx| Venues::update(tx, id, &replacement))
            .expect("update");
        assert!(updated);

        let venue = store
            .read(|conn| Venues::get(conn, id))
            .expect("get")
            .expect("exists");
        assert_eq!(venue.name, "New Name");
        assert_eq!(venue.city, "Portland");
        assert_eq!(venue.phone, None);
        assert!(!venue.seeking_talent);
    }

    #[test]
    fn update_and_delete_report_missing_rows() {
        let store = Store::in_memory().expect("store");
        let draft = venue_draft("Ghost", "Boise", "ID");
        assert!(!store.transaction(|tx| Venues::update(tx, 99, &draft)).expect("update"));
        assert!(!store.transaction(|tx| Venues::delete(tx, 99)).expect("delete"));
        assert!(store.read(|conn| Venues::get(conn, 99)).expect("get").is_none());
    }

    #[test]
    fn delete_cascades_to_shows() {
        let store = Store::in_memory().expect("store");
        let (venue_id, show_id) = store
            .transaction(|tx| {
                let venue_id = Venues::create(tx, &venue_draft("Doomed", "Boise", "ID"))?;
                let artist_id = Artists::create(tx, &artist_draft("Survivor"))?;
                let show_id = Shows::create(
                    tx,
                    &ShowDraft {
                        venue_id,
                        artist_id,
                        start_time: now(),
                    },
                )?;
                Ok((venue_id, show_id))
            })
            .expect("setup");

        assert!(store.transaction(|tx| Venues::delete(tx, venue_id)).expect("delete"));
        assert!(store.read(|conn| Shows::get(conn, show_id)).expect("get").is_none());
        assert_eq!(store.read(|conn| Artists::list(conn)).expect("list").len(), 1);
        let areas = store
            .read(|conn| Venues::grouped_by_area(conn, now()))
            .expect("areas");
        assert!(areas.is_empty());
    }

    #[test]
    fn grouping_never_duplicates_an_area() {
        let areas = group_by_area(vec![
            row(1, "San Francisco", "CA"),
            row(2, "New York", "NY"),
            row(3, "San Francisco", "CA"),
            row(4, "Portland", "OR"),
            row(5, "Portland", "ME"),
        ]);

        let keys: Vec<(&str, &str)> = areas
            .iter()
            .map(|a| (a.city.as_str(), a.state.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("New York", "NY"),
                ("Portland", "ME"),
                ("Portland", "OR"),
                ("San Francisco", "CA"),
            ]
        );
        let sf: Vec<i64> = areas[3].venues.iter().map(|v| v.id).collect();
        assert_eq!(sf, vec![1, 3]);
    }

    #[test]
    fn area_listing_counts_only_upcoming_shows() {
        let store = Store::in_memory().expect("store");
        let venue_id = store
            .transaction(|tx| {
                let venue_id = Venues::create(tx, &venue_draft("Counter", "Boise", "ID"))?;
                Venues::create(tx, &venue_draft("Quiet", "Boise", "ID"))?;
                let artist_id = Artists::create(tx, &artist_draft("Busy"))?;
                for offset in [-2, -1, 1, 2, 3] {
                    Shows::create(
                        tx,
                        &ShowDraft {
                            venue_id,
                            artist_id,
                            start_time: now() + Duration::days(offset),
                        },
                    )?;
                }
                Ok(venue_id)
            })
            .expect("setup");

        let areas = store
            .read(|conn| Venues::grouped_by_area(conn, now()))
            .expect("areas");
        assert_eq!(areas.len(), 1);
        let counts: Vec<(i64, i64)> = areas[0]
            .venues
            .iter()
            .map(|v| (v.id, v.num_upcoming_shows))
            .collect();
        assert_eq!(counts, vec![(venue_id, 3), (venue_id + 1, 0)]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let store = Store::in_memory().expect("store");
        store
            .transaction(|tx| {
                Venues::create(tx, &venue_draft("The Musical Hop", "San Francisco", "CA"))?;
                Venues::create(tx, &venue_draft("The Dueling Pianos Bar", "New York", "NY"))?;
                Venues::create(
                    tx,
                    &venue_draft("Park Square Live Music & Coffee", "San Francisco", "CA"),
                )?;
                Ok(())
            })
            .expect("setup");

        let names = |term: &str| -> Vec<String> {
            store
                .read(|conn| Venues::search(conn, term, now()))
                .expect("search")
                .into_iter()
                .map(|v| v.name)
                .collect()
        };

        assert_eq!(names("Hop"), vec!["The Musical Hop".to_string()]);
        assert_eq!(
            names("music"),
            vec![
                "The Musical Hop".to_string(),
                "Park Square Live Music & Coffee".to_string()
            ]
        );
        assert!(names("zzz").is_empty());
        assert_eq!(names("").len(), 3);
        assert!(names("%").is_empty());
    }

    #[test]
    fn detail_splits_shows_at_query_time() {
        let store = Store::in_memory().expect("store");
        let venue_id = store
            .transaction(|tx| {
                let venue_id = Venues::create(tx, &venue_draft("Split", "Boise", "ID"))?;
                let early = Artists::create(tx, &artist_draft("Early"))?;
                let late = Artists::create(tx, &artist_draft("Late"))?;
                Shows::create(
                    tx,
                    &ShowDraft {
                        venue_id,
                        artist_id: early,
                        start_time: now() - Duration::days(10),
                    },
                )?;
                Shows::create(
                    tx,
                    &ShowDraft {
                        venue_id,
                        artist_id: late,
                        start_time: now() + Duration::days(10),
                    },
                )?;
                Ok(venue_id)
            })
            .expect("setup");

        let detail = store
            .read(|conn| Venues::detail(conn, venue_id, now()))
            .expect("detail")
            .expect("exists");
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.past_shows[0].artist_name, "Early");
        assert_eq!(detail.upcoming_shows[0].artist_name, "Late");
        assert_eq!(
            detail.upcoming_shows[0].artist_image_link.as_deref(),
            Some("https://img.example.com/Late")
        );

        // Same data, later clock: everything is past.
        let later = store
            .read(|conn| Venues::detail(conn, venue_id, now() + Duration::days(30)))
            .expect("detail")
            .expect("exists");
        assert_eq!(later.past_shows_count, 2);
        assert_eq!(later.upcoming_shows_count, 0);

        assert!(store
            .read(|conn| Venues::detail(conn, venue_id + 100, now()))
            .expect("detail")
            .is_none());
    }
}
