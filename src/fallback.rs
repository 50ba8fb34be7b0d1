//! # Fallback Tide Model
//!
//! This module provides a mathematical fallback when the NOAA tide service is unavailable.
//! It produces the same shape of data NOAA would have returned for "today": local station
//! timestamps from 00:00 to 23:54 at 6-minute spacing, so the rest of the pipeline (chart,
//! live marker, extrema) runs unchanged.
//!
//! ## Model Characteristics
//!
//! ### Semidiurnal Pattern
//! Two harmonic constituents, phased against the absolute clock:
//! - **M2** (principal lunar): 12.42 hour period, 4.3 ft amplitude
//! - **S2** (principal solar): 12.00 hour period, 0.6 ft amplitude
//! - **Mean level**: 4.9 ft above MLLW
//!
//! The beat between M2 and S2 gives a rough spring-neap envelope over ~14.8 days.
//!
//! ### Accuracy Trade-offs
//! - ✅ **Correct period**: two highs and two lows per day
//! - ✅ **Advances with real time**: phase derives from the instant, not the date
//! - ❌ **Not synchronized to the station**: high water times can be hours off
//! - ❌ **No meteorological effects**
//!
//! The series is marked `offline` so the dashboard warns the user.

use crate::{Station, TideSample, TideSeries};
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use std::f64::consts::TAU;

/// NOAA's default prediction interval
const STEP_MINUTES: i64 = 6;

const MEAN_LEVEL_FT: f64 = 4.9;
const A_M2: f64 = 4.3;
const P_M2_HRS: f64 = 12.42;
const A_S2: f64 = 0.6;
const P_S2_HRS: f64 = 12.0;

fn constituent(at: DateTime<Utc>, amplitude: f64, period_hrs: f64) -> f64 {
    let period_secs = period_hrs * 3600.0;
    let phase = (at.timestamp() as f64).rem_euclid(period_secs) / period_secs * TAU;
    amplitude * phase.sin()
}

/// Height of the model tide at an instant.
pub fn height_at(at: DateTime<Utc>) -> f64 {
    MEAN_LEVEL_FT + constituent(at, A_M2, P_M2_HRS) + constituent(at, A_S2, P_S2_HRS)
}

/// Approximate today's tide series for `station`, in the station's local day.
///
/// Local times skipped by a spring-forward transition are left out, as they
/// would be in NOAA's own `lst_ldt` output.
pub fn approximate(station: Station, now: DateTime<Utc>, tz: Tz) -> TideSeries {
    let midnight = now.with_timezone(&tz).date_naive().and_time(chrono::NaiveTime::MIN);

    let samples: Vec<TideSample> = (0..24 * 60 / STEP_MINUTES)
        .filter_map(|step| {
            let local = midnight + Duration::minutes(step * STEP_MINUTES);
            let at = tz.from_local_datetime(&local).earliest()?;
            Some(TideSample::new(
                local.format("%Y-%m-%d %H:%M").to_string(),
                height_at(at.with_timezone(&Utc)),
            ))
        })
        .collect();

    tracing::info!(station = %station.id, samples = samples.len(), "using offline tide model");
    TideSeries {
        station,
        samples,
        offline: true,
    }
}
