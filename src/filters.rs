//! Template filters.

use chrono::format::{Item, StrftimeItems};
use minijinja::{Error as TemplateError, ErrorKind};

use crate::utils;

const FULL: &str = "%A %B, %-d, %Y at %-I:%M%p";
const MEDIUM: &str = "%a %m, %d, %Y %-I:%M%p";
const SHORT: &str = "%m/%d/%Y, %H:%M";

/// Formats a timestamp string for display.
///
/// `format` is one of `full`, `medium` (the default) or `short`; anything else
/// is treated as a strftime pattern.
pub fn format_datetime(value: &str, format: Option<&str>) -> Result<String, String> {
    let timestamp =
        utils::parse_timestamp(value).ok_or_else(|| format!("unrecognised timestamp {value:?}"))?;

    let pattern = match format.unwrap_or("medium") {
        "full" => FULL,
        "medium" => MEDIUM,
        "short" => SHORT,
        custom => custom,
    };
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid datetime format {pattern:?}"));
    }

    Ok(timestamp.format(pattern).to_string())
}

/// `{{ value|datetime }}` / `{{ value|datetime('full') }}`
pub fn datetime(value: String, format: Option<String>) -> Result<String, TemplateError> {
    format_datetime(&value, format.as_deref())
        .map_err(|msg| TemplateError::new(ErrorKind::InvalidOperation, msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_is_the_default() {
        assert_eq!(
            format_datetime("2019-05-21T21:30:00", None).expect("format"),
            "Tue 05, 21, 2019 9:30PM"
        );
    }

    #[test]
    fn full_spells_out_day_and_month() {
        assert_eq!(
            format_datetime("2019-05-21 21:30:00", Some("full")).expect("format"),
            "Tuesday May, 21, 2019 at 9:30PM"
        );
        assert_eq!(
            format_datetime("2035-04-01 08:05:00", Some("full")).expect("format"),
            "Sunday April, 1, 2035 at 8:05AM"
        );
    }

    #[test]
    fn short_matches_detail_pages() {
        assert_eq!(
            format_datetime("2019-06-15 23:00:00", Some("short")).expect("format"),
            "06/15/2019, 23:00"
        );
    }

    #[test]
    fn custom_patterns_pass_through() {
        assert_eq!(
            format_datetime("2019-06-15 23:00:00", Some("%Y")).expect("format"),
            "2019"
        );
    }

    #[test]
    fn bad_input_is_an_error() {
        assert!(format_datetime("soon", None).is_err());
        assert!(format_datetime("2019-06-15 23:00:00", Some("%Q")).is_err());
    }

    #[test]
    fn filter_reports_template_errors() {
        let err = datetime("soon".into(), None).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }
}
