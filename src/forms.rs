//! Form payloads and their server-side checks.
//!
//! Every form deserializes leniently (missing fields become empty) and is then
//! checked by `validate`, which produces the draft handed to the store.
//! Checkboxes post the sentinel `y` when ticked and nothing otherwise.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Artist, ArtistDraft, ShowDraft, Venue, VenueDraft};
use crate::utils;

pub const CHECKED: &str = "y";

pub const STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

pub const GENRES: [&str; 19] = [
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").expect("valid phone regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: Option<String>,
    pub seeking_description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: Option<String>,
    pub seeking_description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

/// Collects every problem with a submission so they can be reported together.
#[derive(Default)]
struct Checks {
    problems: Vec<String>,
}

impl Checks {
    fn required(&mut self, field: &str, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.problems.push(format!("{field} is required"));
        }
        trimmed.to_string()
    }

    fn state(&mut self, value: &str) -> String {
        let state = self.required("state", value);
        if !state.is_empty() && !STATES.contains(&state.as_str()) {
            self.problems.push(format!("{state} is not a valid state"));
        }
        state
    }

    fn genres(&mut self, values: &[String]) -> Vec<String> {
        let genres: Vec<String> = values
            .iter()
            .map(|genre| genre.trim().to_string())
            .filter(|genre| !genre.is_empty())
            .collect();
        if genres.is_empty() {
            self.problems.push("genres is required".to_string());
        }
        for genre in &genres {
            if !GENRES.contains(&genre.as_str()) {
                self.problems.push(format!("{genre} is not a valid genre"));
            }
        }
        genres
    }

    fn phone(&mut self, value: &str) -> Option<String> {
        let phone = optional(value)?;
        if !PHONE_RE.is_match(&phone) {
            self.problems
                .push(format!("phone {phone} should look like xxx-xxx-xxxx"));
        }
        Some(phone)
    }

    fn id(&mut self, field: &str, value: &str) -> i64 {
        let raw = self.required(field, value);
        if raw.is_empty() {
            return 0;
        }
        raw.parse().unwrap_or_else(|_| {
            self.problems.push(format!("{field} must be a number"));
            0
        })
    }

    fn finish<T>(self, value: T) -> Result<T> {
        if self.problems.is_empty() {
            Ok(value)
        } else {
            Err(Error::Validation(self.problems.join("; ")))
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_checked(value: &Option<String>) -> bool {
    value.as_deref() == Some(CHECKED)
}

fn checkbox(value: bool) -> Option<String> {
    value.then(|| CHECKED.to_string())
}

impl VenueForm {
    pub fn validate(&self) -> Result<VenueDraft> {
        let mut checks = Checks::default();
        let draft = VenueDraft {
            name: checks.required("name", &self.name),
            city: checks.required("city", &self.city),
            state: checks.state(&self.state),
            address: checks.required("address", &self.address),
            phone: checks.phone(&self.phone),
            genres: checks.genres(&self.genres),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            seeking_talent: is_checked(&self.seeking_talent),
            seeking_description: optional(&self.seeking_description),
        };
        checks.finish(draft)
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            genres: venue.genres.clone(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website_link: venue.website_link.clone().unwrap_or_default(),
            seeking_talent: checkbox(venue.seeking_talent),
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ArtistDraft> {
        let mut checks = Checks::default();
        let draft = ArtistDraft {
            name: checks.required("name", &self.name),
            city: checks.required("city", &self.city),
            state: checks.state(&self.state),
            phone: checks.phone(&self.phone),
            genres: checks.genres(&self.genres),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            seeking_venue: is_checked(&self.seeking_venue),
            seeking_description: optional(&self.seeking_description),
        };
        checks.finish(draft)
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            genres: artist.genres.clone(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website_link: artist.website_link.clone().unwrap_or_default(),
            seeking_venue: checkbox(artist.seeking_venue),
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }
}

impl ShowForm {
    /// Blank form with the start time defaulted to now.
    pub fn starting_now() -> Self {
        Self {
            start_time: utils::now_local().format("%Y-%m-%d %H:%M:%S").to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ShowDraft> {
        let mut checks = Checks::default();
        let artist_id = checks.id("artist_id", &self.artist_id);
        let venue_id = checks.id("venue_id", &self.venue_id);
        let raw_start = checks.required("start_time", &self.start_time);
        let start_time = utils::parse_timestamp(&raw_start);
        if start_time.is_none() && !raw_start.is_empty() {
            checks
                .problems
                .push(format!("start_time {raw_start} is not a date and time"));
        }

        match start_time {
            Some(start_time) => checks.finish(ShowDraft {
                venue_id,
                artist_id,
                start_time,
            }),
            None => Err(Error::Validation(checks.problems.join("; "))),
        }
    }
}
