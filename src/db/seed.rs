use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;
use tracing::info;

use super::{Artists, Repository, Shows, Store, Venues};
use crate::error::Result;
use crate::models::{ArtistDraft, ShowDraft, VenueDraft};
use crate::utils;

impl Store {
    /// Loads the demo listings when the database has no venues yet.
    /// Returns whether anything was inserted.
    pub fn seed_if_empty(&self) -> Result<bool> {
        let now = utils::now_local();
        let seeded = self.transaction(|tx| {
            let count: i64 = tx.query_row("SELECT COUNT(*) FROM venues", [], |row| row.get(0))?;
            if count > 0 {
                return Ok(false);
            }
            insert_samples(tx, now)?;
            Ok(true)
        })?;
        if seeded {
            info!("seeded demo venues, artists and shows");
        }
        Ok(seeded)
    }
}

fn insert_samples(conn: &Connection, now: NaiveDateTime) -> Result<()> {
    let musical_hop = Venues::create(
        conn,
        &VenueDraft {
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: Some("123-123-1234".into()),
            genres: strings(&["Jazz", "Reggae", "Classical", "Folk"]),
            image_link: Some("https://images.unsplash.com/photo-1543900694-133f37abaaa5?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60".into()),
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            website_link: Some("https://www.themusicalhop.com".into()),
            seeking_talent: true,
            seeking_description: Some(
                "We are on the lookout for a local artist to play every two weeks. Please call us."
                    .into(),
            ),
        },
    )?;
    Venues::create(
        conn,
        &VenueDraft {
            name: "The Dueling Pianos Bar".into(),
            city: "New York".into(),
            state: "NY".into(),
            address: "335 Delancey Street".into(),
            phone: Some("914-003-1132".into()),
            genres: strings(&["Classical", "R&B", "Hip-Hop"]),
            image_link: Some("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?ixlib=rb-1.2.1&auto=format&fit=crop&w=750&q=80".into()),
            facebook_link: Some("https://www.facebook.com/theduelingpianos".into()),
            website_link: Some("https://www.theduelingpianos.com".into()),
            seeking_talent: false,
            seeking_description: None,
        },
    )?;
    let park_square = Venues::create(
        conn,
        &VenueDraft {
            name: "Park Square Live Music & Coffee".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "34 Whiskey Moore Ave".into(),
            phone: Some("415-000-1234".into()),
            genres: strings(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
            image_link: Some("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?ixlib=rb-1.2.1&auto=format&fit=crop&w=747&q=80".into()),
            facebook_link: Some("https://www.facebook.com/ParkSquareLiveMusicAndCoffee".into()),
            website_link: Some("https://www.parksquarelivemusicandcoffee.com".into()),
            seeking_talent: false,
            seeking_description: None,
        },
    )?;

    let guns_n_petals = Artists::create(
        conn,
        &ArtistDraft {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: Some("326-123-5000".into()),
            genres: strings(&["Rock n Roll"]),
            image_link: Some("https://images.unsplash.com/photo-1549213783-8284d0336c4f?ixlib=rb-1.2.1&auto=format&fit=crop&w=300&q=80".into()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
            website_link: Some("https://www.gunsnpetalsband.com".into()),
            seeking_venue: true,
            seeking_description: Some(
                "Looking for shows to perform at in the San Francisco Bay Area!".into(),
            ),
        },
    )?;
    let matt_quevedo = Artists::create(
        conn,
        &ArtistDraft {
            name: "Matt Quevedo".into(),
            city: "New York".into(),
            state: "NY".into(),
            phone: Some("300-400-5000".into()),
            genres: strings(&["Jazz"]),
            image_link: Some("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?ixlib=rb-1.2.1&auto=format&fit=crop&w=334&q=80".into()),
            facebook_link: Some("https://www.facebook.com/mattquevedo923251523".into()),
            website_link: None,
            seeking_venue: false,
            seeking_description: None,
        },
    )?;
    let wild_sax = Artists::create(
        conn,
        &ArtistDraft {
            name: "The Wild Sax Band".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: Some("432-325-5432".into()),
            genres: strings(&["Jazz", "Classical"]),
            image_link: Some("https://images.unsplash.com/photo-1558369981-f9ca78462e61?ixlib=rb-1.2.1&auto=format&fit=crop&w=794&q=80".into()),
            facebook_link: None,
            website_link: None,
            seeking_venue: false,
            seeking_description: None,
        },
    )?;

    let samples = [
        (musical_hop, guns_n_petals, now - Duration::days(60)),
        (park_square, matt_quevedo, now - Duration::days(30)),
        (park_square, wild_sax, now + Duration::days(14)),
        (park_square, wild_sax, now + Duration::days(21)),
        (park_square, wild_sax, now + Duration::days(28)),
    ];
    for (venue_id, artist_id, start_time) in samples {
        Shows::create(
            conn,
            &ShowDraft {
                venue_id,
                artist_id,
                start_time,
            },
        )?;
    }

    Ok(())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
