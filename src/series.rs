//! Conversion of tide samples into chart-ready label/value arrays.

use crate::noaa::Prediction;
use crate::timestamps::parse_instant;
use crate::{Station, TideSample, TideSeries};
use chrono::Timelike;
use chrono_tz::Tz;

/// Parallel label/value arrays, one entry per sample, in sample order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Split samples into chart labels and values.
///
/// Labels are passed through untouched; validation happens wherever a label
/// is parsed as a point in time.
pub fn build(samples: &[TideSample]) -> ChartSeries {
    let (labels, values) = samples
        .iter()
        .map(|sample| (sample.timestamp.clone(), sample.height))
        .unzip();
    ChartSeries { labels, values }
}

impl TideSample {
    /// Convert a raw NOAA prediction. Non-numeric or non-finite heights become `NaN`.
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let height = prediction
            .v
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|h| h.is_finite())
            .unwrap_or(f64::NAN);
        if height.is_nan() {
            tracing::warn!(t = %prediction.t, v = %prediction.v, "non-numeric tide height");
        }
        TideSample::new(prediction.t.clone(), height)
    }
}

pub fn series_from_predictions(station: Station, predictions: &[Prediction]) -> TideSeries {
    TideSeries {
        station,
        samples: predictions.iter().map(TideSample::from_prediction).collect(),
        offline: false,
    }
}

/// X-axis tick text: `"HH:MM"` for on-the-hour samples, empty otherwise.
pub fn axis_tick_label(label: &str, tz: Tz) -> String {
    match parse_instant(label, tz) {
        Ok(instant) => {
            let local = instant.with_timezone(&tz);
            if local.minute() == 0 {
                local.format("%H:%M").to_string()
            } else {
                String::new()
            }
        }
        Err(_) => String::new(),
    }
}
