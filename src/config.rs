//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-config.toml file.
//! It provides a centralized way to configure the tide station, forecast grid point,
//! live-marker timing and extrema detection.

use crate::extrema::DEFAULT_MIN_SEPARATION_HOURS;
use crate::live_marker::DEFAULT_TOLERANCE_MINUTES;
use crate::units::WindUnit;
use crate::Station;
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file, looked up in the working directory
pub const CONFIG_FILE: &str = "tide-config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("config encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// NOAA tide station selection
    pub station: StationConfig,
    /// weather.gov hourly forecast grid point
    pub forecast: ForecastConfig,
    /// Live "current tide" marker timing
    pub marker: MarkerConfig,
    /// Daily high/low detection
    pub extrema: ExtremaConfig,
    /// Terminal output options
    pub display: DisplayConfig,
}

/// NOAA tide station configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationConfig {
    /// Selected station ID (e.g., "8447180" for Sandwich, MA)
    pub id: String,
    /// IANA time zone NOAA's local-time predictions are reported in
    pub timezone: String,
    /// Stations the dashboard knows by name
    pub stations: Vec<Station>,
}

/// Hourly forecast source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    /// NWS forecast office (e.g., "BOX" for Boston)
    pub office: String,
    pub grid_x: u32,
    pub grid_y: u32,
    /// weather.gov rejects requests without a User-Agent
    pub user_agent: String,
    /// Request timeout in seconds for both NOAA services
    pub timeout_secs: u64,
}

/// Live marker configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkerConfig {
    /// A sample counts as "now" when within this many minutes
    pub tolerance_minutes: i64,
    /// Repaint period of the pulsing marker
    pub tick_millis: u64,
}

/// Extrema detection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtremaConfig {
    /// Minimum time between the two highs (and the two lows)
    pub min_separation_hours: i64,
}

/// Terminal display configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Wind speed unit shown at startup
    pub default_unit: WindUnit,
    /// Height of the ASCII chart in rows
    pub chart_rows: usize,
    /// Maximum width of the ASCII chart in columns
    pub chart_columns: usize,
    /// Number of hourly forecast periods listed under the chart
    pub forecast_hours: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig {
                id: "8447180".to_string(),
                timezone: "America/New_York".to_string(),
                stations: vec![
                    Station::new("8447180", "Sandwich, MA"),
                    Station::new("8443970", "Boston, MA"),
                    Station::new("8447930", "Woods Hole, MA"),
                    Station::new("8446121", "Provincetown, MA"),
                ],
            },
            forecast: ForecastConfig {
                office: "BOX".to_string(),
                grid_x: 95,
                grid_y: 66,
                user_agent: concat!("poseidon/", env!("CARGO_PKG_VERSION")).to_string(),
                timeout_secs: 15,
            },
            marker: MarkerConfig {
                tolerance_minutes: DEFAULT_TOLERANCE_MINUTES,
                tick_millis: 500,
            },
            extrema: ExtremaConfig {
                min_separation_hours: DEFAULT_MIN_SEPARATION_HOURS,
            },
            display: DisplayConfig {
                default_unit: WindUnit::Mph,
                chart_rows: 16,
                chart_columns: 96,
                forecast_hours: 6,
            },
        }
    }
}

impl StationConfig {
    /// The selected station, named if it appears in the station list
    pub fn selected(&self) -> Station {
        self.stations
            .iter()
            .find(|station| station.id == self.id)
            .cloned()
            .unwrap_or_else(|| Station::new(self.id.clone(), self.id.clone()))
    }

    /// Station time zone, falling back to US Eastern on an unknown name
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(timezone = %self.timezone, "unknown time zone, using America/New_York");
            chrono_tz::America::New_York
        })
    }
}

impl MarkerConfig {
    pub fn tolerance(&self) -> Duration {
        Duration::minutes(self.tolerance_minutes)
    }
}

impl ExtremaConfig {
    pub fn min_separation(&self) -> Duration {
        Duration::hours(self.min_separation_hours)
    }
}

impl Config {
    /// Load configuration from tide-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!(station = %config.station.id, "loaded configuration");
                    config
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        tracing::info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.station.id, "8447180");
        assert_eq!(config.station.selected().name, "Sandwich, MA");
        assert_eq!(config.marker.tolerance(), Duration::minutes(5));
        assert_eq!(config.marker.tick_millis, 500);
        assert_eq!(config.extrema.min_separation(), Duration::hours(6));
        assert_eq!(config.display.default_unit, WindUnit::Mph);
    }

    #[test]
    fn defaults_follow_pipeline_constants() {
        let config = Config::default();
        assert_eq!(config.marker.tolerance_minutes, DEFAULT_TOLERANCE_MINUTES);
        assert_eq!(config.extrema.min_separation_hours, DEFAULT_MIN_SEPARATION_HOURS);
    }

    #[test]
    fn config_roundtrip() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.station.id = "8443970".to_string();
        config.display.default_unit = WindUnit::Knots;
        config.save_to_path(file.path()).unwrap();

        let parsed = Config::load_from_path(file.path());
        assert_eq!(parsed.station.selected().name, "Boston, MA");
        assert_eq!(parsed.display.default_unit, WindUnit::Knots);
    }

    #[test]
    fn load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.station.id, "8447180");
    }

    #[test]
    fn invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "station = 12").unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.station.id, "8447180");
    }

    #[test]
    fn unknown_station_uses_id_as_name() {
        let mut config = Config::default();
        config.station.id = "9999999".to_string();
        let station = config.station.selected();
        assert_eq!(station.id, "9999999");
        assert_eq!(station.name, "9999999");
    }

    #[test]
    fn bad_timezone_falls_back() {
        let mut config = Config::default();
        config.station.timezone = "Mars/Olympus".to_string();
        assert_eq!(config.station.tz(), chrono_tz::America::New_York);
        config.station.timezone = "America/Los_Angeles".to_string();
        assert_eq!(config.station.tz(), chrono_tz::America::Los_Angeles);
    }
}
