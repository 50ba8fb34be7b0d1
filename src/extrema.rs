//! # Daily High and Low Tides
//!
//! Finds the two highest and two lowest samples of the day. A semidiurnal tide
//! has two highs and two lows roughly 12 hours 25 minutes apart, and the curve
//! is smooth, so any two samples within a few hours of each other near the top
//! belong to the same peak. The second extremum of each kind is therefore
//! required to lie more than `min_separation` (6 hours by default) from the
//! first.
//!
//! ## Algorithm
//! Two linear passes, order-sensitive:
//! 1. Highest and lowest sample overall, strict `>` / `<` against running
//!    sentinels, so the earliest sample wins a tie.
//! 2. Highest sample with `|t - t_high1| > min_separation`, and likewise for
//!    the lowest.
//!
//! Separation is measured between absolute instants from
//! [`parse_instant`](crate::timestamps::parse_instant). Samples whose timestamp
//! cannot be parsed, and samples with a `NaN` height, are never selected.
//!
//! ## Sentinels
//! A slot nothing qualified for keeps a sentinel sample with height `-∞`
//! (highs) or `+∞` (lows) and an empty timestamp. Use
//! [`ExtremaPair::primary`] / [`ExtremaPair::secondary`], which hide
//! sentinels, rather than reading the fields directly for display.

use crate::timestamps::parse_all;
use crate::TideSample;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

pub const DEFAULT_MIN_SEPARATION_HOURS: i64 = 6;

fn sentinel(height: f64) -> TideSample {
    TideSample::new(String::new(), height)
}

fn is_sentinel(sample: &TideSample) -> bool {
    sample.height.is_infinite()
}

/// First and second extremum of one kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtremaPair {
    pub primary: TideSample,
    pub secondary: TideSample,
}

impl ExtremaPair {
    fn seeking_high() -> Self {
        Self {
            primary: sentinel(f64::NEG_INFINITY),
            secondary: sentinel(f64::NEG_INFINITY),
        }
    }

    fn seeking_low() -> Self {
        Self {
            primary: sentinel(f64::INFINITY),
            secondary: sentinel(f64::INFINITY),
        }
    }

    pub fn primary(&self) -> Option<&TideSample> {
        Some(&self.primary).filter(|s| !is_sentinel(s))
    }

    pub fn secondary(&self) -> Option<&TideSample> {
        Some(&self.secondary).filter(|s| !is_sentinel(s))
    }

    /// Real samples found, primary first.
    pub fn found(&self) -> impl Iterator<Item = &TideSample> {
        self.primary().into_iter().chain(self.secondary())
    }
}

/// The day's two highs and two lows.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyExtremes {
    pub highs: ExtremaPair,
    pub lows: ExtremaPair,
}

impl Default for DailyExtremes {
    fn default() -> Self {
        Self {
            highs: ExtremaPair::seeking_high(),
            lows: ExtremaPair::seeking_low(),
        }
    }
}

impl DailyExtremes {
    /// True when neither a primary high nor a primary low was found
    /// (empty or unusable series).
    pub fn is_empty(&self) -> bool {
        self.highs.primary().is_none() && self.lows.primary().is_none()
    }
}

fn within(a: DateTime<Utc>, b: DateTime<Utc>, window: Duration) -> bool {
    (a - b).num_milliseconds().abs() <= window.num_milliseconds()
}

/// Find the day's highs and lows, each pair separated by more than `min_separation`.
pub fn find_daily_extremes(
    series: &[TideSample],
    min_separation: Duration,
    tz: Tz,
) -> DailyExtremes {
    let instants = parse_all(series.iter().map(|s| s.timestamp.as_str()), tz);
    let candidates: Vec<(&TideSample, DateTime<Utc>)> = series
        .iter()
        .zip(instants)
        .filter_map(|(sample, at)| at.map(|at| (sample, at)))
        .collect();

    let mut extremes = DailyExtremes::default();
    let mut high_at = None;
    let mut low_at = None;

    for &(sample, at) in &candidates {
        if sample.height > extremes.highs.primary.height {
            extremes.highs.primary = sample.clone();
            high_at = Some(at);
        }
        if sample.height < extremes.lows.primary.height {
            extremes.lows.primary = sample.clone();
            low_at = Some(at);
        }
    }

    for &(sample, at) in &candidates {
        if let Some(high_at) = high_at {
            if !within(at, high_at, min_separation)
                && sample.height > extremes.highs.secondary.height
            {
                extremes.highs.secondary = sample.clone();
            }
        }
        if let Some(low_at) = low_at {
            if !within(at, low_at, min_separation)
                && sample.height < extremes.lows.secondary.height
            {
                extremes.lows.secondary = sample.clone();
            }
        }
    }

    tracing::debug!(
        samples = series.len(),
        usable = candidates.len(),
        highs = extremes.highs.found().count(),
        lows = extremes.lows.found().count(),
        "daily extremes computed"
    );
    extremes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;
    use std::f64::consts::TAU;

    fn six_hours() -> Duration {
        Duration::hours(DEFAULT_MIN_SEPARATION_HOURS)
    }

    fn hourly(heights: &[f64]) -> Vec<TideSample> {
        heights
            .iter()
            .enumerate()
            .map(|(hour, &h)| TideSample::new(format!("2025-07-24 {hour:02}:00"), h))
            .collect()
    }

    fn times<'a>(pair: &'a ExtremaPair) -> Vec<&'a str> {
        let mut times: Vec<&str> = pair.found().map(|s| s.timestamp.as_str()).collect();
        times.sort();
        times
    }

    #[test]
    fn finds_both_semidiurnal_highs_and_lows() {
        // Peaks at 06:00 and 18:00, troughs at 00:00 and 12:00
        let heights: Vec<f64> = (0..24)
            .map(|h| 5.0 - 4.0 * (TAU * h as f64 / 12.0).cos())
            .collect();
        let extremes = find_daily_extremes(&hourly(&heights), six_hours(), New_York);

        assert_eq!(times(&extremes.highs), vec!["2025-07-24 06:00", "2025-07-24 18:00"]);
        assert_eq!(times(&extremes.lows), vec!["2025-07-24 00:00", "2025-07-24 12:00"]);
    }

    #[test]
    fn second_extremum_may_come_from_far_side() {
        let series = vec![
            TideSample::new("2025-07-24 00:00", 1.0),
            TideSample::new("2025-07-24 01:00", 5.0),
            TideSample::new("2025-07-24 02:00", 1.0),
            TideSample::new("2025-07-24 07:00", 9.0),
        ];
        let extremes = find_daily_extremes(&series, six_hours(), New_York);

        assert_eq!(extremes.highs.primary().unwrap().height, 9.0);
        // 01:00 and 02:00 are within 6h of 07:00; only 00:00 qualifies
        assert_eq!(extremes.highs.secondary().unwrap().timestamp, "2025-07-24 00:00");

        // Earliest wins the tie for the lowest
        assert_eq!(extremes.lows.primary().unwrap().timestamp, "2025-07-24 00:00");
        assert_eq!(extremes.lows.secondary().unwrap().timestamp, "2025-07-24 07:00");
    }

    #[test]
    fn exactly_min_separation_is_excluded() {
        let series = hourly(&[9.0, 1.0, 1.0, 1.0, 1.0, 1.0, 8.0]);
        let extremes = find_daily_extremes(&series, six_hours(), New_York);
        assert!(extremes.highs.secondary().is_none());
    }

    #[test]
    fn empty_series_keeps_all_sentinels() {
        let extremes = find_daily_extremes(&[], six_hours(), New_York);
        assert!(extremes.is_empty());
        assert_eq!(extremes.highs.primary.height, f64::NEG_INFINITY);
        assert_eq!(extremes.highs.secondary.height, f64::NEG_INFINITY);
        assert_eq!(extremes.lows.primary.height, f64::INFINITY);
        assert_eq!(extremes.lows.secondary.height, f64::INFINITY);
        assert_eq!(extremes.highs.found().count(), 0);
    }

    #[test]
    fn one_usable_sample_is_not_empty() {
        let series = vec![
            TideSample::new("2025-07-24 00:00", f64::NAN),
            TideSample::new("2025-07-24 01:00", 2.5),
        ];
        let extremes = find_daily_extremes(&series, six_hours(), New_York);
        assert!(!extremes.is_empty());
        assert!(find_daily_extremes(&series[..1], six_hours(), New_York).is_empty());
    }

    #[test]
    fn flat_series_does_not_reuse_primary() {
        let series = hourly(&[3.0; 6]);
        let extremes = find_daily_extremes(&series, six_hours(), New_York);

        assert_eq!(extremes.highs.primary().unwrap().timestamp, "2025-07-24 00:00");
        assert!(extremes.highs.secondary().is_none());
        assert!(extremes.lows.secondary().is_none());
    }

    // A flat day keeps the secondary slot empty only while every sample lies
    // within the separation window of the primary. Over a full day, 07:00 is
    // the first sample more than 6h from 00:00 and beats the -inf sentinel
    // under the strict comparison, so it becomes the secondary high. What the
    // separation rule forbids is reusing the primary sample itself.
    #[test]
    fn flat_full_day_picks_distinct_samples() {
        let series = hourly(&[3.0; 24]);
        let extremes = find_daily_extremes(&series, six_hours(), New_York);
        assert_ne!(extremes.highs.primary, extremes.highs.secondary);
        assert_eq!(extremes.highs.secondary().unwrap().timestamp, "2025-07-24 07:00");
    }

    #[test]
    fn nan_heights_are_never_selected() {
        let series = hourly(&[f64::NAN, 2.0, f64::NAN, 4.0]);
        let extremes = find_daily_extremes(&series, six_hours(), New_York);
        assert_eq!(extremes.highs.primary().unwrap().height, 4.0);
        assert_eq!(extremes.lows.primary().unwrap().height, 2.0);
    }

    #[test]
    fn unparseable_timestamps_are_skipped() {
        let series = vec![
            TideSample::new("noon-ish", 99.0),
            TideSample::new("2025-07-24 03:00", 4.0),
        ];
        let extremes = find_daily_extremes(&series, six_hours(), New_York);
        assert_eq!(extremes.highs.primary().unwrap().height, 4.0);
    }

    #[test]
    fn separation_uses_instants_across_midnight() {
        // 22:00 and 02:00 next day are 4 hours apart, not 20
        let series = vec![
            TideSample::new("2025-07-24 22:00", 9.0),
            TideSample::new("2025-07-25 02:00", 8.5),
            TideSample::new("2025-07-25 10:00", 8.0),
        ];
        let extremes = find_daily_extremes(&series, six_hours(), New_York);
        assert_eq!(extremes.highs.secondary().unwrap().timestamp, "2025-07-25 10:00");
    }
}
