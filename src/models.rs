use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Field values for creating or overwriting a venue.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct VenueDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ArtistDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShowDraft {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: NaiveDateTime,
}

/// Row on the listing and search pages.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Venues sharing one (city, state) pair.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CityArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// An artist playing at the venue being displayed.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ArtistAppearance {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// A venue hosting the artist being displayed.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct VenueAppearance {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<ArtistAppearance>,
    pub upcoming_shows: Vec<ArtistAppearance>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<VenueAppearance>,
    pub upcoming_shows: Vec<VenueAppearance>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// One row of the `/shows` page.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

pub trait Scheduled {
    fn start_time(&self) -> NaiveDateTime;
}

impl Scheduled for ArtistAppearance {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}

impl Scheduled for VenueAppearance {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}

impl Scheduled for Show {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}

/// Splits into `(past, upcoming)`. A show starting exactly at `now` is past.
pub fn split_past_upcoming<T: Scheduled>(items: Vec<T>, now: NaiveDateTime) -> (Vec<T>, Vec<T>) {
    items.into_iter().partition(|item| item.start_time() <= now)
}

impl VenueDetail {
    pub fn new(venue: Venue, shows: Vec<ArtistAppearance>, now: NaiveDateTime) -> Self {
        let (past_shows, upcoming_shows) = split_past_upcoming(shows, now);
        Self {
            venue,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

impl ArtistDetail {
    pub fn new(artist: Artist, shows: Vec<VenueAppearance>, now: NaiveDateTime) -> Self {
        let (past_shows, upcoming_shows) = split_past_upcoming(shows, now);
        Self {
            artist,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid time")
    }

    fn appearance(id: i64, start_time: NaiveDateTime) -> ArtistAppearance {
        ArtistAppearance {
            artist_id: id,
            artist_name: format!("Artist {id}"),
            artist_image_link: None,
            start_time,
        }
    }

    #[test]
    fn split_uses_now_as_boundary() {
        let now = noon();
        let shows = vec![
            appearance(1, now - Duration::days(3)),
            appearance(2, now),
            appearance(3, now + Duration::seconds(1)),
            appearance(4, now + Duration::days(30)),
        ];

        let (past, upcoming) = split_past_upcoming(shows, now);
        let past_ids: Vec<i64> = past.iter().map(|s| s.artist_id).collect();
        let upcoming_ids: Vec<i64> = upcoming.iter().map(|s| s.artist_id).collect();
        assert_eq!(past_ids, vec![1, 2]);
        assert_eq!(upcoming_ids, vec![3, 4]);
        assert!(past.iter().all(|s| s.start_time <= now));
        assert!(upcoming.iter().all(|s| s.start_time > now));
    }

    #[test]
    fn detail_counts_match_lists() {
        let now = noon();
        let venue = Venue {
            id: 7,
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: None,
            genres: vec!["Jazz".into()],
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_talent: false,
            seeking_description: None,
        };
        let detail = VenueDetail::new(
            venue,
            vec![appearance(1, now - Duration::hours(1)), appearance(2, now + Duration::hours(1))],
            now,
        );
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);

        let json = serde_json::to_value(&detail).expect("serialize detail");
        assert_eq!(json["name"], "The Musical Hop");
        assert_eq!(json["upcoming_shows"][0]["artist_id"], 2);
    }

    #[test]
    fn search_results_count_data() {
        let results = SearchResults::new(vec![1, 2, 3]);
        assert_eq!(results.count, 3);
        assert!(SearchResults::<i64>::new(Vec::new()).data.is_empty());
    }
}
