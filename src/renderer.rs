//! # Terminal Dashboard Rendering
//!
//! This module draws the dashboard as text: an ASCII tide chart with the live
//! marker, the day's highs and lows, current wind, and a short hourly forecast.
//! Output is returned as a `String` so the caller decides where it goes.
//!
//! The chart plots one column per sample, or per group of samples when the
//! series is wider than the configured column limit (a 6-minute NOAA day has
//! 240 samples).

use crate::config::DisplayConfig;
use crate::dashboard::Dashboard;
use crate::extrema::ExtremaPair;
use crate::live_marker::MarkerFrame;
use crate::series::axis_tick_label;
use crate::timestamps::parse_instant;
use crate::units::NOT_AVAILABLE;
use chrono_tz::Tz;
use std::fmt::Write;

/// Width reserved for Y-axis labels
const Y_AXIS_WIDTH: usize = 5;

/// Format a tide height to one decimal, without a trailing ".0"
fn format_height(tide_ft: f64) -> String {
    let rounded = (tide_ft * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

/// Finite (min, max) of the values, `None` when there are none
fn value_bounds(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Clock time of a sample label, e.g. "6:12 AM"
fn clock_time(label: &str, tz: Tz) -> String {
    parse_instant(label, tz)
        .map(|at| at.with_timezone(&tz).format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| label.to_string())
}

fn draw_chart(out: &mut String, dashboard: &Dashboard, frame: Option<&MarkerFrame>, config: &DisplayConfig) {
    let chart = dashboard.chart();
    let Some((min, max)) = value_bounds(&chart.values) else {
        let _ = writeln!(out, "No tide data available");
        return;
    };

    let rows = config.chart_rows.max(2);
    let stride = chart.len().div_ceil(config.chart_columns.max(1)).max(1);
    let columns = chart.len().div_ceil(stride);
    let span = if max > min { max - min } else { 1.0 };

    let tide_to_row = |tide_ft: f64| {
        let normalized = (tide_ft - min) / span;
        ((1.0 - normalized) * (rows as f64 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; columns + Y_AXIS_WIDTH]; rows];

    // Y-axis labels, one per foot (or half foot on small ranges)
    let step = if span > 4.0 { 1.0 } else { 0.5 };
    let mut level = (min / step).ceil() * step;
    while level <= max {
        let row = tide_to_row(level).min(rows - 1);
        let label = format!("{:<width$}", format_height(level), width = Y_AXIS_WIDTH - 1);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
        grid[row][Y_AXIS_WIDTH - 1] = '│';
        level += step;
    }

    for (column, chunk) in chart.values.chunks(stride).enumerate() {
        let finite: Vec<f64> = chunk.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            continue;
        }
        let mean = finite.iter().sum::<f64>() / finite.len() as f64;
        grid[tide_to_row(mean).min(rows - 1)][column + Y_AXIS_WIDTH] = '•';
    }

    // Current tide marker, heavier while the pulse is emphasized. A frame
    // whose index is past this series draws nothing.
    if let Some(frame) = frame.filter(|f| f.value.is_finite() && f.index < chart.len()) {
        let mark = if frame.border_width > 1 { '●' } else { 'o' };
        let row = tide_to_row(frame.value).min(rows - 1);
        if let Some(cell) = grid
            .get_mut(row)
            .and_then(|r| r.get_mut(frame.index / stride + Y_AXIS_WIDTH))
        {
            *cell = mark;
        }
    }

    for row in grid {
        let _ = writeln!(out, "{}", row.into_iter().collect::<String>().trim_end());
    }

    // Hour labels every six hours along the bottom
    let mut axis = vec![' '; columns + Y_AXIS_WIDTH + 5];
    for (column, chunk) in chart.labels.chunks(stride).enumerate() {
        let tick = axis_tick_label(&chunk[0], dashboard.tz());
        let Ok(hour) = tick.get(..2).unwrap_or_default().parse::<u32>() else {
            continue;
        };
        if hour % 6 != 0 {
            continue;
        }
        for (i, ch) in tick.chars().enumerate() {
            axis[column + Y_AXIS_WIDTH + i] = ch;
        }
    }
    let _ = writeln!(out, "{}", axis.into_iter().collect::<String>().trim_end());
}

fn describe_pair(pair: &ExtremaPair, tz: Tz) -> String {
    let found: Vec<String> = pair
        .found()
        .map(|s| format!("{} {} ft", clock_time(&s.timestamp, tz), format_height(s.height)))
        .collect();
    if found.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        found.join(", ")
    }
}

/// Render the whole dashboard as text.
pub fn render_ascii(dashboard: &Dashboard, frame: Option<&MarkerFrame>, config: &DisplayConfig) -> String {
    let mut out = String::new();
    let tz = dashboard.tz();

    if let Some(series) = dashboard.series() {
        let _ = writeln!(out, "{} ({})", series.station.name, series.station.id);
        if series.offline {
            let _ = writeln!(out, "⚠ OFFLINE");
        }
    }
    let _ = writeln!(out);

    draw_chart(&mut out, dashboard, frame, config);
    let _ = writeln!(out);

    let now = match frame {
        Some(f) if f.value.is_finite() => format!("{} ft", format_height(f.value)),
        _ => NOT_AVAILABLE.to_string(),
    };
    let _ = writeln!(out, "Now:   {now}");
    let _ = writeln!(out, "High:  {}", describe_pair(&dashboard.extremes().highs, tz));
    let _ = writeln!(out, "Low:   {}", describe_pair(&dashboard.extremes().lows, tz));
    let _ = writeln!(
        out,
        "Wind:  {} {}",
        dashboard.wind_speed_display(),
        dashboard.wind_direction()
    );

    let hours = dashboard.hourly_weather(config.forecast_hours);
    if !hours.is_empty() {
        let _ = writeln!(out);
        for hour in hours {
            let dew = hour
                .dew_point
                .map(|d| format!("{d}°F"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let rain = hour
                .precipitation
                .map(|p| format!("{p}%"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let _ = writeln!(
                out,
                "{:>5}  {:>5}  {:<12} {:<3}  dew {:<7} rain {:<4} {}",
                hour.hour, hour.temperature, hour.wind_speed, hour.wind_direction, dew, rain, hour.short_forecast
            );
        }
    }

    out
}
