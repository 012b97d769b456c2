//! Analysis thresholds.
//!
//! [`AnalyseParams`] is the fully resolved set the core runs with.
//! Requests carry a [`PartialAnalyseParams`]; missing fields are filled from
//! a defaults value passed in by the caller via [`PartialAnalyseParams::resolve`].

use serde::{Deserialize, Serialize};

/// Seconds per minute, for the minute-denominated thresholds.
const SECS_PER_MIN: f64 = 60.0;

/// Thresholds controlling motion classification and segment filtering.
///
/// Values are expected to be finite and non-negative. They are not
/// validated here: out-of-range values simply yield degenerate
/// segmentations (everything moving, everything stationary, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyseParams {
    /// Speed floor for "moving", km/h.
    /// Default: 2.0
    pub v_min_kmh: f64,

    /// Per-interval displacement floor for "moving", meters.
    /// Default: 50.0
    pub d_min_m: f64,

    /// Minimum ride duration, minutes.
    /// Default: 3.0
    pub ride_min_min: f64,

    /// Minimum stop duration, minutes.
    /// Default: 5.0
    pub stop_min_min: f64,

    /// Time gap between consecutive fixes that forces a split, minutes.
    /// Default: 20.0
    pub gap_split_min: f64,
}

impl Default for AnalyseParams {
    fn default() -> Self {
        Self {
            v_min_kmh: 2.0,
            d_min_m: 50.0,
            ride_min_min: 3.0,
            stop_min_min: 5.0,
            gap_split_min: 20.0,
        }
    }
}

impl AnalyseParams {
    #[inline]
    pub fn ride_min_s(&self) -> f64 {
        self.ride_min_min * SECS_PER_MIN
    }

    #[inline]
    pub fn stop_min_s(&self) -> f64 {
        self.stop_min_min * SECS_PER_MIN
    }

    #[inline]
    pub fn gap_split_s(&self) -> f64 {
        self.gap_split_min * SECS_PER_MIN
    }
}

/// Caller-supplied overrides; `None` means "use the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialAnalyseParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_min_kmh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d_min_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_min_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_min_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_split_min: Option<f64>,
}

impl PartialAnalyseParams {
    /// Merge these overrides over `defaults`.
    pub fn resolve(&self, defaults: &AnalyseParams) -> AnalyseParams {
        AnalyseParams {
            v_min_kmh: self.v_min_kmh.unwrap_or(defaults.v_min_kmh),
            d_min_m: self.d_min_m.unwrap_or(defaults.d_min_m),
            ride_min_min: self.ride_min_min.unwrap_or(defaults.ride_min_min),
            stop_min_min: self.stop_min_min.unwrap_or(defaults.stop_min_min),
            gap_split_min: self.gap_split_min.unwrap_or(defaults.gap_split_min),
        }
    }
}
