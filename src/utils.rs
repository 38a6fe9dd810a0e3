use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use dirs::data_dir;
use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let base = data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let root = base.join("venue-book");
    if let Err(err) = fs::create_dir_all(&root) {
        warn!("failed to create data root {:?}: {err}", root);
    }
    root
});

pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

pub fn database_path() -> PathBuf {
    data_root().join("venue-book.sqlite")
}

pub fn config_path() -> PathBuf {
    data_root().join("config.json")
}

pub fn log_path() -> PathBuf {
    data_root().join("error.log")
}

pub fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if parent.as_os_str().is_empty() {
            return;
        }
        if let Err(err) = fs::create_dir_all(parent) {
            warn!("failed to create parent {:?}: {err}", parent);
        }
    }
}

/// Wall-clock time used to split shows into past and upcoming.
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Parses the timestamp shapes that reach us from forms, the database and
/// templates.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let cleaned = input.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%m/%d/%Y, %H:%M:%S",
        "%m/%d/%Y, %H:%M",
    ];
    for fmt in formats.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt);
        }
    }

    chrono::NaiveDate::parse_from_str(cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .expect("valid timestamp")
    }

    #[test]
    fn parses_form_and_storage_shapes() {
        let expected = at(2019, 5, 21, 21, 30, 0);
        assert_eq!(parse_timestamp("2019-05-21 21:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2019-05-21T21:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2019-05-21T21:30"), Some(expected));
        assert_eq!(parse_timestamp(" 2019-05-21 21:30 "), Some(expected));
        assert_eq!(parse_timestamp("05/21/2019, 21:30"), Some(expected));
    }

    #[test]
    fn parses_bare_dates_as_midnight() {
        let parsed = parse_timestamp("2035-04-01").expect("date only");
        assert_eq!(parsed.year(), 2035);
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("2019-13-40 10:00"), None);
    }

    #[test]
    fn now_has_whole_seconds() {
        assert_eq!(now_local().nanosecond(), 0);
    }
}
