//! # NOAA Data Fetching
//!
//! This module is the fetch boundary for the two public NOAA services the
//! dashboard reads. Responses are decoded into explicit record types here, so
//! nothing past this module handles untyped JSON.
//!
//! ## Data Sources
//!
//! ### Tides and Currents (tide predictions)
//! - **URL**: https://api.tidesandcurrents.noaa.gov/api/prod/datagetter
//! - **Query**: `product=predictions&date=today&datum=MLLW&time_zone=lst_ldt`
//! - **Format**: `{"predictions": [{"t": "2025-07-24 00:00", "v": "1.234"}, ...]}`
//!   at 6-minute intervals, local station time, heights in feet as text
//! - **High/low query**: the same with `interval=hilo`; each record also
//!   carries `"type": "H"` or `"L"`
//!
//! ### weather.gov (hourly forecast)
//! - **URL**: https://api.weather.gov/gridpoints/{office}/{x},{y}/forecast/hourly
//! - **Format**: GeoJSON with `properties.periods[]`; only the fields in
//!   [`ForecastPeriod`] are read
//!
//! ## Error Handling
//!
//! The module handles multiple failure modes:
//! - **Network failures and timeouts**: surfaced as [`FetchError::Http`]
//! - **Server errors**: non-2xx statuses are treated as fetch failures
//! - **NOAA API errors**: the datagetter answers HTTP 200 with
//!   `{"error": {"message": ...}}` for bad stations or dates
//! - **Unexpected payloads**: JSON that does not match the schema
//!
//! No retries are made. On any error the caller falls back to
//! [`crate::fallback::approximate`] for tides and shows "N/A" for weather.

use crate::config::ForecastConfig;
use crate::series::series_from_predictions;
use crate::{Station, TideSeries};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const DATAGETTER: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";
const WEATHER_GOV: &str = "https://api.weather.gov";

/// Errors that can occur while fetching or decoding NOAA data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not the JSON shape we expect
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// NOAA reported an error in an otherwise successful response
    #[error("NOAA API error: {0}")]
    Api(String),

    /// Station returned no predictions for today
    #[error("no predictions for station {0}")]
    NoPredictions(String),
}

/// One tide prediction as NOAA sends it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Prediction {
    /// Local station time, `YYYY-MM-DD HH:MM`
    pub t: String,
    /// Height in feet, as text
    pub v: String,
}

/// Whether a high/low prediction is a high or a low tide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum TideTurn {
    #[serde(rename = "H")]
    High,
    #[serde(rename = "L")]
    Low,
}

/// One official high or low tide time from the `interval=hilo` product.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HiloPrediction {
    pub t: String,
    pub v: String,
    #[serde(rename = "type")]
    pub turn: TideTurn,
}

#[derive(Debug, Deserialize)]
struct PredictionsResponse<T> {
    #[serde(default = "Vec::new")]
    predictions: Vec<T>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<ForecastPeriod>,
}

/// A value with a WMO unit code, e.g. `{"unitCode": "wmoUnit:degC", "value": 17.2}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitativeValue {
    #[serde(default)]
    pub unit_code: String,
    pub value: Option<f64>,
}

/// One hour of the weather.gov hourly forecast.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub start_time: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: Option<String>,
    /// e.g. "10 mph" or "5 to 10 mph"
    #[serde(default)]
    pub wind_speed: Option<String>,
    /// Compass point, e.g. "SW"
    #[serde(default)]
    pub wind_direction: Option<String>,
    /// Degrees Celsius
    #[serde(default)]
    pub dewpoint: Option<QuantitativeValue>,
    #[serde(default)]
    pub probability_of_precipitation: Option<QuantitativeValue>,
    #[serde(default)]
    pub short_forecast: Option<String>,
}

/// Today's 6-minute predictions for a station, heights above MLLW in feet.
pub fn tide_predictions_url(station_id: &str) -> String {
    format!(
        "{DATAGETTER}?station={station_id}&product=predictions&date=today\
         &units=english&format=json&time_zone=lst_ldt&datum=MLLW"
    )
}

/// Today's official high and low tide times, on the same datum as
/// [`tide_predictions_url`] so heights can be compared directly.
pub fn hilo_predictions_url(station_id: &str) -> String {
    format!(
        "{DATAGETTER}?station={station_id}&product=predictions&date=today&interval=hilo\
         &units=english&format=json&time_zone=lst_ldt&datum=MLLW"
    )
}

pub fn hourly_forecast_url(config: &ForecastConfig) -> String {
    format!(
        "{WEATHER_GOV}/gridpoints/{}/{},{}/forecast/hourly",
        config.office, config.grid_x, config.grid_y
    )
}

/// Decode a datagetter predictions body.
pub fn decode_predictions(body: &str) -> Result<Vec<Prediction>, FetchError> {
    decode_datagetter(body)
}

/// Decode a datagetter `interval=hilo` body.
pub fn decode_hilo_predictions(body: &str) -> Result<Vec<HiloPrediction>, FetchError> {
    decode_datagetter(body)
}

fn decode_datagetter<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, FetchError> {
    let response: PredictionsResponse<T> = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(FetchError::Api(error.message));
    }
    Ok(response.predictions)
}

/// Decode a weather.gov hourly forecast body.
pub fn decode_forecast(body: &str) -> Result<Vec<ForecastPeriod>, FetchError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    Ok(response.properties.periods)
}

/// Async client for both NOAA services.
#[derive(Clone, Debug)]
pub struct NoaaClient {
    http: reqwest::Client,
    forecast_url: String,
}

impl NoaaClient {
    pub fn new(config: &ForecastConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            forecast_url: hourly_forecast_url(config),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        tracing::debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }

    pub async fn hourly_forecast(&self) -> Result<Vec<ForecastPeriod>, FetchError> {
        let body = self.get_text(&self.forecast_url).await?;
        let periods = decode_forecast(&body)?;
        tracing::info!(periods = periods.len(), "hourly forecast loaded");
        Ok(periods)
    }

    pub async fn tide_predictions(&self, station: &Station) -> Result<Vec<Prediction>, FetchError> {
        let body = self.get_text(&tide_predictions_url(&station.id)).await?;
        decode_predictions(&body)
    }

    /// Today's official high and low tides for a station.
    pub async fn hilo_predictions(&self, station: &Station) -> Result<Vec<HiloPrediction>, FetchError> {
        let body = self.get_text(&hilo_predictions_url(&station.id)).await?;
        let turns = decode_hilo_predictions(&body)?;
        tracing::info!(station = %station.id, turns = turns.len(), "high/low predictions loaded");
        Ok(turns)
    }

    /// Fetch today's predictions and convert them into a [`TideSeries`].
    pub async fn tide_series(&self, station: &Station) -> Result<TideSeries, FetchError> {
        let predictions = self.tide_predictions(station).await?;
        if predictions.is_empty() {
            return Err(FetchError::NoPredictions(station.id.clone()));
        }
        tracing::info!(station = %station.id, samples = predictions.len(), "tide predictions loaded");
        Ok(series_from_predictions(station.clone(), &predictions))
    }
}
