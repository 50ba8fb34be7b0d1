//! Unit conversion and wind-speed formatting for the dashboard.

use crate::timestamps::parse_instant;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statute miles per hour in one knot
const MPH_PER_KNOT: f64 = 1.15078;

/// Placeholder shown for any field with no data
pub const NOT_AVAILABLE: &str = "N/A";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert miles per hour to knots, rounded to 2 decimal places.
pub fn mph_to_knots(mph: f64) -> f64 {
    round2(mph / MPH_PER_KNOT)
}

/// Convert knots to miles per hour, rounded to 2 decimal places.
pub fn knots_to_mph(knots: f64) -> f64 {
    round2(knots * MPH_PER_KNOT)
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// First run of digits in a forecast wind string ("10 mph", "5 to 10 mph").
///
/// Strings without digits read as calm (0).
pub fn parse_wind_speed(raw: &str) -> u32 {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Wind speed unit selected by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Mph,
    Knots,
}

impl WindUnit {
    /// The other unit
    pub fn toggle(self) -> Self {
        match self {
            WindUnit::Mph => WindUnit::Knots,
            WindUnit::Knots => WindUnit::Mph,
        }
    }
}

impl fmt::Display for WindUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindUnit::Mph => f.write_str("mph"),
            WindUnit::Knots => f.write_str("knots"),
        }
    }
}

/// Wind speed text for display, e.g. `"12 mph"` or `"10.43 knots"`.
///
/// Missing or blank input renders as `"N/A"`.
pub fn wind_speed_display(raw: Option<&str>, unit: WindUnit) -> String {
    let raw = match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let mph = parse_wind_speed(raw);
    match unit {
        WindUnit::Mph => format!("{mph} {unit}"),
        WindUnit::Knots => format!("{} {unit}", mph_to_knots(f64::from(mph))),
    }
}

/// Hour of day in the station's zone, e.g. `"2 PM"`.
pub fn readable_hour(timestamp: &str, tz: Tz) -> Option<String> {
    parse_instant(timestamp, tz)
        .ok()
        .map(|instant| instant.with_timezone(&tz).format("%-I %p").to_string())
}
