//! # End-to-End Pipeline Tests
//!
//! These tests run NOAA-shaped JSON through the whole pipeline: decode,
//! series building, extrema, live marker ticks and text rendering. They use
//! fixed instants so results do not depend on the wall clock.

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::America::New_York;
use poseidon_lib::config::Config;
use poseidon_lib::dashboard::Dashboard;
use poseidon_lib::noaa::{decode_forecast, decode_predictions};
use poseidon_lib::series::series_from_predictions;
use poseidon_lib::{build, find_daily_extremes, fallback, renderer, MarkerState, Station};

/// A day of 6-minute predictions with highs near 06:00 and 18:30.
fn predictions_body() -> String {
    let entries: Vec<String> = (0..240)
        .map(|i| {
            let minutes = i * 6;
            let hours = minutes as f64 / 60.0;
            let height = 4.9 - 4.3 * (std::f64::consts::TAU * hours / 12.42).cos();
            format!(
                r#"{{"t":"2025-07-24 {:02}:{:02}","v":"{:.3}"}}"#,
                minutes / 60,
                minutes % 60,
                height
            )
        })
        .collect();
    format!(r#"{{"predictions":[{}]}}"#, entries.join(","))
}

fn local(h: u32, m: u32) -> DateTime<Utc> {
    New_York
        .with_ymd_and_hms(2025, 7, 24, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn sandwich() -> Station {
    Station::new("8447180", "Sandwich, MA")
}

#[test]
fn predictions_flow_into_chart_and_extremes() {
    let predictions = decode_predictions(&predictions_body()).expect("valid body");
    let series = series_from_predictions(sandwich(), &predictions);
    let chart = build(&series.samples);

    assert_eq!(chart.len(), 240);
    assert_eq!(chart.labels[0], "2025-07-24 00:00");
    assert_eq!(chart.values[0], 0.6);

    let extremes = find_daily_extremes(&series.samples, Duration::hours(6), New_York);
    let highs: Vec<&str> = extremes.highs.found().map(|s| s.timestamp.as_str()).collect();
    let lows: Vec<&str> = extremes.lows.found().map(|s| s.timestamp.as_str()).collect();

    // Peaks at 6.21h and 18.63h, troughs at 0h and 12.42h
    assert!(highs.contains(&"2025-07-24 06:12"), "highs were {highs:?}");
    assert!(highs.contains(&"2025-07-24 18:36"), "highs were {highs:?}");
    assert!(lows.contains(&"2025-07-24 00:00"), "lows were {lows:?}");
    assert!(lows.contains(&"2025-07-24 12:24") || lows.contains(&"2025-07-24 12:30"), "lows were {lows:?}");
}

#[test]
fn dashboard_ticks_and_renders() {
    let predictions = decode_predictions(&predictions_body()).unwrap();
    let mut dashboard = Dashboard::new(&Config::default());
    dashboard.load_series(series_from_predictions(sandwich(), &predictions));

    let forecast = decode_forecast(
        r#"{"properties":{"periods":[{"startTime":"2025-07-24T14:00:00-04:00","windSpeed":"12 mph","windDirection":"NE"}]}}"#,
    )
    .unwrap();
    dashboard.set_forecast(forecast);
    dashboard.toggle_unit();

    // Eight ticks inside the tolerance window bring the pulse back around
    let mut frame = None;
    for _ in 0..8 {
        frame = dashboard.tick(local(14, 1));
    }
    assert_eq!(dashboard.marker_state(), MarkerState::default());

    let frame = frame.expect("14:00 sample is current");
    assert_eq!(frame.index, 140);
    assert_eq!(frame.overlay.iter().filter(|v| v.is_some()).count(), 1);

    let text = renderer::render_ascii(&dashboard, Some(&frame), &Config::default().display);
    assert!(text.contains("Sandwich, MA (8447180)"));
    assert!(text.contains("Wind:  10.43 knots NE"));
    assert!(text.contains("2 PM"));
}

#[test]
fn stale_series_has_no_current_sample() {
    let predictions = decode_predictions(&predictions_body()).unwrap();
    let mut dashboard = Dashboard::new(&Config::default());
    dashboard.load_series(series_from_predictions(sandwich(), &predictions));

    // The next day: nothing within five minutes
    let tomorrow = local(14, 0) + Duration::days(1);
    assert!(dashboard.tick(tomorrow).is_none());
    assert_eq!(dashboard.marker_state(), MarkerState::default());

    let text = renderer::render_ascii(&dashboard, None, &Config::default().display);
    assert!(text.contains("Now:   N/A"));
}

#[test]
fn malformed_heights_do_not_break_the_pipeline() {
    let body = r#"{"predictions":[
        {"t":"2025-07-24 00:00","v":"1.0"},
        {"t":"2025-07-24 00:06","v":""},
        {"t":"2025-07-24 07:00","v":"8.0"}
    ]}"#;
    let predictions = decode_predictions(body).unwrap();
    let series = series_from_predictions(sandwich(), &predictions);
    assert!(series.samples[1].height.is_nan());

    let extremes = find_daily_extremes(&series.samples, Duration::hours(6), New_York);
    assert_eq!(extremes.highs.primary().unwrap().height, 8.0);
    assert_eq!(extremes.highs.secondary().unwrap().height, 1.0);
}

#[test]
fn offline_model_feeds_dashboard() {
    let series = fallback::approximate(sandwich(), local(12, 0), New_York);
    let mut dashboard = Dashboard::new(&Config::default());
    dashboard.load_series(series);

    assert!(dashboard.tick(local(12, 2)).is_some());
    assert!(!dashboard.extremes().is_empty());

    let text = renderer::render_ascii(&dashboard, None, &Config::default().display);
    assert!(text.contains("⚠ OFFLINE"));
}
