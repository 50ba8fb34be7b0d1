//! # Live "Current Tide" Marker
//!
//! The chart highlights the sample closest to the current time with a pulsing
//! dot. This module holds the pure pieces of that behavior:
//!
//! - [`locate`] picks the sample that counts as "now"
//! - [`MarkerState::advance`] is one step of the pulse animation
//! - [`render_overlay`] builds the overlay series the renderer draws
//!
//! The repaint timer belongs to the caller. [`LiveMarker`] is the per-chart
//! state holder the caller ticks once per period (500 ms by default).
//!
//! ## Pulse Cycle
//! Starting from radius 10 and growing, the radius steps by 2 up to 14, back
//! down to 6 and up again, returning to its starting state every 8 ticks:
//!
//! ```text
//! 10 → 12 → 14 → 12 → 10 → 8 → 6 → 8 → 10
//! ```

use crate::series::ChartSeries;
use crate::timestamps::parse_instant;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

pub const DEFAULT_TOLERANCE_MINUTES: i64 = 5;

const RADIUS_STEP: u32 = 2;
const RADIUS_MAX: u32 = 14;
const RADIUS_MIN: u32 = 6;
/// Nominal radius; anything larger draws a thick outline
const RADIUS_BASELINE: u32 = 10;

/// Index of the first sample within `tolerance` of `now`.
///
/// The first qualifying sample in series order wins, even when a later one
/// is closer. Labels that do not parse are never current.
pub fn locate(
    series: &ChartSeries,
    now: DateTime<Utc>,
    tolerance: Duration,
    tz: Tz,
) -> Option<usize> {
    let limit = tolerance.num_milliseconds();
    series.labels.iter().position(|label| {
        parse_instant(label, tz)
            .map(|at| (at - now).num_milliseconds().abs() < limit)
            .unwrap_or(false)
    })
}

/// Overlay series: absent everywhere except the current index.
pub fn render_overlay(len: usize, index: Option<usize>, value: f64) -> Vec<Option<f64>> {
    let mut overlay = vec![None; len];
    if let Some(slot) = index.and_then(|i| overlay.get_mut(i)) {
        *slot = Some(value);
    }
    overlay
}

/// Pulse animation state for one chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerState {
    pub radius: u32,
    pub growing: bool,
}

impl Default for MarkerState {
    fn default() -> Self {
        Self {
            radius: RADIUS_BASELINE,
            growing: true,
        }
    }
}

impl MarkerState {
    /// One animation step.
    pub fn advance(self) -> Self {
        if self.growing {
            let radius = self.radius + RADIUS_STEP;
            Self {
                radius,
                growing: radius < RADIUS_MAX,
            }
        } else {
            let radius = self.radius.saturating_sub(RADIUS_STEP);
            Self {
                radius,
                growing: radius <= RADIUS_MIN,
            }
        }
    }

    /// True while the marker is drawn larger than its nominal size.
    pub fn emphasize(&self) -> bool {
        self.radius > RADIUS_BASELINE
    }

    pub fn border_width(&self) -> u32 {
        if self.emphasize() {
            3
        } else {
            1
        }
    }
}

/// Everything the renderer needs to draw the marker for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerFrame {
    pub index: usize,
    pub value: f64,
    pub radius: u32,
    pub border_width: u32,
    pub overlay: Vec<Option<f64>>,
}

/// Caller-owned marker for one chart/series pairing.
#[derive(Clone, Debug)]
pub struct LiveMarker {
    state: MarkerState,
    tolerance: Duration,
    tz: Tz,
}

impl LiveMarker {
    pub fn new(tolerance: Duration, tz: Tz) -> Self {
        Self {
            state: MarkerState::default(),
            tolerance,
            tz,
        }
    }

    pub fn state(&self) -> MarkerState {
        self.state
    }

    /// Back to the initial pulse state, used when a new series is loaded.
    pub fn reset(&mut self) {
        self.state = MarkerState::default();
    }

    /// Run one timer tick.
    ///
    /// When no sample is current the pulse does not advance and `None` is
    /// returned; the renderer then draws `render_overlay(len, None, _)`.
    pub fn tick(&mut self, series: &ChartSeries, now: DateTime<Utc>) -> Option<MarkerFrame> {
        let index = locate(series, now, self.tolerance, self.tz)?;
        let value = series.values.get(index).copied()?;

        self.state = self.state.advance();
        Some(MarkerFrame {
            index,
            value,
            radius: self.state.radius,
            border_width: self.state.border_width(),
            overlay: render_overlay(series.len(), Some(index), value),
        })
    }
}
