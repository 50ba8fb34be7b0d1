//! # Poseidon Core Library
//!
//! This library provides the data structures and the tide-data transformation
//! pipeline behind the Poseidon coastal dashboard. Everything in here is plain
//! data processing: the binary owns the network fetch, the periodic timer and
//! the terminal output, and hands data to these functions.
//!
//! ## Pipeline
//!
//! ```text
//! NOAA predictions ──► series::build ──► ChartSeries
//!                                   ├──► live_marker (every 500 ms tick)
//!                                   └──► extrema::find_daily_extremes (once per load)
//! ```
//!
//! 1. **SeriesBuilder** ([`series`]): raw `{t, v}` predictions become ordered
//!    [`TideSample`]s, then parallel label/value arrays for charting.
//! 2. **LiveMarker** ([`live_marker`]): finds the sample closest to "now"
//!    within a tolerance and animates a pulsing marker radius.
//! 3. **ExtremaFinder** ([`extrema`]): two highs and two lows for the day,
//!    with the second of each kind at least 6 hours from the first.
//!
//! ## Time Handling
//!
//! NOAA reports predictions in local station time (`time_zone=lst_ldt`), so
//! every comparison between samples goes through [`timestamps::parse_instant`],
//! which resolves labels to absolute instants in the station's time zone. Two
//! samples straddling a DST change are compared correctly.
//!
//! ## Core Types
//! - [`TideSample`]: one timestamped tide height
//! - [`TideSeries`]: a station's samples for one day plus an offline flag
//! - [`Station`]: a NOAA station identifier and display name

use serde::{Deserialize, Serialize};

pub mod config;
pub mod dashboard;
pub mod extrema;
pub mod fallback;
pub mod live_marker;
pub mod logging;
pub mod noaa;
pub mod renderer;
pub mod series;
pub mod timestamps;
pub mod units;

pub use extrema::{find_daily_extremes, DailyExtremes, ExtremaPair};
pub use live_marker::{locate, render_overlay, LiveMarker, MarkerFrame, MarkerState};
pub use series::{build, ChartSeries};

/// A single tide height reading.
///
/// The timestamp is kept exactly as received from upstream; it is parsed
/// only when a consumer needs to compare it against another point in time.
/// A height that could not be parsed is stored as `NaN`.
///
/// # Example
/// ```
/// use poseidon_lib::TideSample;
///
/// let sample = TideSample::new("2025-07-24 06:00", 9.1);
/// assert_eq!(sample.timestamp, "2025-07-24 06:00");
/// assert_eq!(sample.height, 9.1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TideSample {
    /// Upstream timestamp, RFC 3339 or NOAA local `YYYY-MM-DD HH:MM`
    pub timestamp: String,
    /// Tide height in feet above MLLW
    pub height: f64,
}

impl TideSample {
    pub fn new(timestamp: impl Into<String>, height: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            height,
        }
    }
}

/// A NOAA tide station.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Numeric NOAA station ID, e.g. "8447180"
    pub id: String,
    /// Human-readable name for display
    pub name: String,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One station's tide samples for "today", in chronological order.
///
/// Samples are kept in upstream order and never re-sorted. No two samples in
/// one series share a timestamp.
///
/// # Offline Behavior
/// When `offline = true`, the samples come from the harmonic model in
/// [`fallback`] rather than from NOAA, and the dashboard shows "⚠ OFFLINE".
///
/// # Example
/// ```
/// use poseidon_lib::{Station, TideSample, TideSeries};
///
/// let series = TideSeries {
///     station: Station::new("8447180", "Sandwich, MA"),
///     samples: vec![
///         TideSample::new("2025-07-24 00:00", 1.2),
///         TideSample::new("2025-07-24 00:06", 1.3),
///     ],
///     offline: false,
/// };
///
/// assert_eq!(series.samples.len(), 2);
/// assert!(!series.offline);
/// ```
#[derive(Clone, Debug)]
pub struct TideSeries {
    /// Station the predictions belong to
    pub station: Station,
    /// Samples ordered by timestamp ascending
    pub samples: Vec<TideSample>,
    /// True if using fallback model instead of real NOAA data
    pub offline: bool,
}
