//! # Timestamp Parsing
//!
//! Sample timestamps arrive as text. The tide source reports local station
//! time without an offset (`2025-07-24 14:06`), while the forecast source uses
//! RFC 3339 with an offset. Both are resolved to absolute UTC instants here so
//! that time differences are correct across midnight and DST transitions.
//!
//! Lexicographic or clock-face comparison of labels is never used.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Local formats NOAA uses for `time_zone=lst_ldt` responses.
const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Error, Debug, PartialEq)]
pub enum TimestampError {
    /// Not RFC 3339 and not a recognised local format
    #[error("unrecognised timestamp: {0:?}")]
    Format(String),

    /// Local time falls in a spring-forward gap
    #[error("local time {0:?} does not exist in {1}")]
    Nonexistent(String, String),
}

/// Parse a sample timestamp into an absolute instant.
///
/// Offset-less timestamps are interpreted in `tz`. A local time that occurs
/// twice (DST fall-back) resolves to the earlier instant.
pub fn parse_instant(raw: &str, tz: Tz) -> Result<DateTime<Utc>, TimestampError> {
    let text = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| TimestampError::Format(raw.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(TimestampError::Nonexistent(
            raw.to_string(),
            tz.name().to_string(),
        )),
    }
}

/// Parse every label up front, keeping positions aligned with the input.
///
/// Unparseable labels become `None` and are logged once at debug level.
pub fn parse_all<'a, I>(labels: I, tz: Tz) -> Vec<Option<DateTime<Utc>>>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .map(|label| match parse_instant(label, tz) {
            Ok(instant) => Some(instant),
            Err(err) => {
                tracing::debug!(%err, "skipping sample with unusable timestamp");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use chrono_tz::America::New_York;

    #[test]
    fn parses_noaa_local_form_in_station_zone() {
        let instant = parse_instant("2025-07-24 14:06", New_York).unwrap();
        // EDT is UTC-4 in July
        assert_eq!(instant.to_rfc3339(), "2025-07-24T18:06:00+00:00");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let instant = parse_instant("2025-07-24T14:00:00-04:00", New_York).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-07-24T18:00:00+00:00");
    }

    #[test]
    fn midnight_rollover_is_two_hours() {
        let late = parse_instant("2025-07-24 23:00", New_York).unwrap();
        let early = parse_instant("2025-07-25 01:00", New_York).unwrap();
        assert_eq!(early - late, Duration::hours(2));
    }

    #[test]
    fn fall_back_hour_resolves_to_earlier_instant() {
        let instant = parse_instant("2025-11-02 01:30", New_York).unwrap();
        // Still EDT (UTC-4) for the first 01:30
        assert_eq!(instant.to_rfc3339(), "2025-11-02T05:30:00+00:00");
    }

    #[test]
    fn spring_forward_gap_is_rejected() {
        let err = parse_instant("2025-03-09 02:30", New_York).unwrap_err();
        assert!(matches!(err, TimestampError::Nonexistent(..)));
    }

    #[test]
    fn garbage_is_a_format_error() {
        assert_eq!(
            parse_instant("3:00 PM", New_York),
            Err(TimestampError::Format("3:00 PM".to_string()))
        );
    }

    #[test]
    fn parse_all_keeps_positions() {
        let parsed = parse_all(["2025-07-24 00:00", "bogus", "2025-07-24 00:12"], New_York);
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].is_some());
        assert!(parsed[1].is_none());
        assert!(parsed[2].is_some());
    }
}
