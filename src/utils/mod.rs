use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::models::player::EXPIRY_FOREVER;

pub fn parse_duration(duration_str: &str) -> Option<Duration> {
    let re = Regex::new(r"^(\d+)([a-zA-Z]+)$").unwrap();
    let caps = re.captures(duration_str)?;

    let value: i64 = caps[1].parse().ok()?;
    let unit = &caps[2];

    match unit {
        "s" => Some(Duration::seconds(value)),
        "m" => Some(Duration::minutes(value)),
        "h" => Some(Duration::hours(value)),
        "d" => Some(Duration::days(value)),
        "mo" => Some(Duration::days(value * 30)), // Approx
        "y" => Some(Duration::days(value * 365)), // Approx
        _ => None,
    }
}

/// Maps a duration string onto the expiry column: "permanent" (or no
/// duration at all) is the -1 sentinel, anything else becomes an absolute
/// unix timestamp. Returns None for strings that parse as neither.
pub fn expiry_from_duration(duration: Option<&str>) -> Option<i64> {
    match duration {
        None | Some("permanent") => Some(EXPIRY_FOREVER),
        Some(s) => parse_duration(s).map(|d| (Utc::now() + d).timestamp()),
    }
}

pub fn format_expiry(expiry: i64) -> String {
    match DateTime::<Utc>::from_timestamp(expiry, 0) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => expiry.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_units() {
        assert_eq!(parse_duration("30s"), Some(Duration::seconds(30)));
        assert_eq!(parse_duration("7d"), Some(Duration::days(7)));
        assert_eq!(parse_duration("2mo"), Some(Duration::days(60)));
    }

    #[test]
    fn rejects_garbage_durations() {
        assert_eq!(parse_duration("7w"), None);
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn permanent_and_missing_map_to_the_sentinel() {
        assert_eq!(expiry_from_duration(None), Some(EXPIRY_FOREVER));
        assert_eq!(expiry_from_duration(Some("permanent")), Some(EXPIRY_FOREVER));
        assert_eq!(expiry_from_duration(Some("later")), None);
    }

    #[test]
    fn timed_duration_lands_in_the_future() {
        let now = Utc::now().timestamp();
        let expiry = expiry_from_duration(Some("1h")).unwrap();
        assert!(expiry >= now + 3590 && expiry <= now + 3700);
    }

    #[test]
    fn formats_known_timestamp() {
        assert_eq!(format_expiry(0), "1970-01-01 00:00:00 UTC");
    }
}
