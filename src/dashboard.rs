//! # Dashboard View State
//!
//! [`Dashboard`] is the single caller-owned state holder for one dashboard
//! view. It keeps the things the UI toggles or animates (wind unit, marker
//! pulse) as plain fields mutated only through its methods, and recomputes
//! derived data when a new tide series or forecast arrives.
//!
//! ## Lifecycle
//! - [`Dashboard::load_series`]: rebuild chart arrays, compute extremes once,
//!   reset the marker pulse
//! - [`Dashboard::tick`]: called by the owner's periodic timer
//! - [`Dashboard::set_forecast`]: keep the latest hourly forecast periods

use crate::config::Config;
use crate::extrema::{find_daily_extremes, DailyExtremes};
use crate::live_marker::{LiveMarker, MarkerFrame, MarkerState};
use crate::noaa::ForecastPeriod;
use crate::series::{build, ChartSeries};
use crate::units::{celsius_to_fahrenheit, readable_hour, wind_speed_display, WindUnit, NOT_AVAILABLE};
use crate::TideSeries;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// One forecast hour, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct HourlyWeather {
    /// e.g. "2 PM"
    pub hour: String,
    pub wind_speed: String,
    pub wind_direction: String,
    /// Degrees Fahrenheit, one decimal
    pub dew_point: Option<f64>,
    pub temperature: String,
    pub short_forecast: String,
    /// Percent chance of precipitation
    pub precipitation: Option<f64>,
}

impl HourlyWeather {
    pub fn from_period(period: &ForecastPeriod, unit: WindUnit, tz: Tz) -> Self {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };

        let temperature = match period.temperature {
            Some(t) => format!(
                "{t}°{}",
                period.temperature_unit.as_deref().unwrap_or("F")
            ),
            None => NOT_AVAILABLE.to_string(),
        };

        Self {
            hour: readable_hour(&period.start_time, tz).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            wind_speed: wind_speed_display(period.wind_speed.as_deref(), unit),
            wind_direction: text(&period.wind_direction),
            dew_point: period
                .dewpoint
                .as_ref()
                .and_then(|d| d.value)
                .map(|c| (celsius_to_fahrenheit(c) * 10.0).round() / 10.0),
            temperature,
            short_forecast: text(&period.short_forecast),
            precipitation: period
                .probability_of_precipitation
                .as_ref()
                .and_then(|p| p.value),
        }
    }
}

/// State for one dashboard view.
#[derive(Debug)]
pub struct Dashboard {
    tz: Tz,
    min_separation: Duration,
    unit: WindUnit,
    series: Option<TideSeries>,
    chart: ChartSeries,
    extremes: DailyExtremes,
    marker: LiveMarker,
    forecast: Vec<ForecastPeriod>,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        let tz = config.station.tz();
        Self {
            tz,
            min_separation: config.extrema.min_separation(),
            unit: config.display.default_unit,
            series: None,
            chart: ChartSeries::default(),
            extremes: DailyExtremes::default(),
            marker: LiveMarker::new(config.marker.tolerance(), tz),
            forecast: Vec::new(),
        }
    }

    /// Replace the tide series. Extremes are computed here, not per tick.
    pub fn load_series(&mut self, series: TideSeries) {
        self.chart = build(&series.samples);
        self.extremes = find_daily_extremes(&series.samples, self.min_separation, self.tz);
        self.marker.reset();
        tracing::info!(
            station = %series.station.id,
            samples = series.samples.len(),
            offline = series.offline,
            "tide series loaded"
        );
        self.series = Some(series);
    }

    /// Advance the live marker for the current time.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<MarkerFrame> {
        self.marker.tick(&self.chart, now)
    }

    pub fn toggle_unit(&mut self) -> WindUnit {
        self.unit = self.unit.toggle();
        self.unit
    }

    pub fn set_unit(&mut self, unit: WindUnit) {
        self.unit = unit;
    }

    pub fn set_forecast(&mut self, periods: Vec<ForecastPeriod>) {
        self.forecast = periods;
    }

    /// Wind speed of the first forecast period in the selected unit.
    pub fn wind_speed_display(&self) -> String {
        let raw = self.forecast.first().and_then(|p| p.wind_speed.as_deref());
        wind_speed_display(raw, self.unit)
    }

    pub fn wind_direction(&self) -> &str {
        self.forecast
            .first()
            .and_then(|p| p.wind_direction.as_deref())
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// The first `hours` forecast periods, formatted.
    pub fn hourly_weather(&self, hours: usize) -> Vec<HourlyWeather> {
        self.forecast
            .iter()
            .take(hours)
            .map(|period| HourlyWeather::from_period(period, self.unit, self.tz))
            .collect()
    }

    pub fn unit(&self) -> WindUnit {
        self.unit
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn series(&self) -> Option<&TideSeries> {
        self.series.as_ref()
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    pub fn extremes(&self) -> &DailyExtremes {
        &self.extremes
    }

    pub fn marker_state(&self) -> MarkerState {
        self.marker.state()
    }
}
