//! Per-point distance and speed annotation.
//!
//! One forward pass over the raw fixes produces a parallel sequence of
//! [`AnnotatedPoint`]s. Each derived field is written once, in index order,
//! and the input slice is never mutated.

use serde::Serialize;
use crate::geo_utils::{haversine_m, HasPosition};
use crate::{GpsPoint, TrackPoint};

/// Intervals shorter than this are treated as this long, seconds.
///
/// Keeps speed finite and non-negative for duplicate or out-of-order timestamps.
pub const MIN_INTERVAL_S: f64 = 1.0;

/// A track fix plus the interval metrics relative to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedPoint {
    /// Epoch milliseconds
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "alt")]
    pub altitude: Option<f64>,
    /// Great-circle distance from the previous point, meters (0 for the first).
    pub dist_m: f64,
    /// Speed over the interval from the previous point, km/h (0 for the first).
    pub speed_kmh: f64,
}

impl AnnotatedPoint {
    fn from_track(point: &TrackPoint, dist_m: f64, speed_kmh: f64) -> Self {
        Self {
            timestamp_ms: point.timestamp_ms,
            latitude: point.latitude,
            longitude: point.longitude,
            altitude: point.altitude,
            dist_m,
            speed_kmh,
        }
    }
}

impl HasPosition for AnnotatedPoint {
    #[inline]
    fn position(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }
}

/// Output of [`annotate_points`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTrack {
    pub points: Vec<AnnotatedPoint>,
    /// Sum of every point's `dist_m`.
    pub total_distance_m: f64,
}

/// Attach incremental distance and instantaneous speed to every fix.
///
/// `dt = max(1, Δt)` seconds, `speed = (dist / 1000) / (dt / 3600)`.
pub fn annotate_points(points: &[TrackPoint]) -> AnnotatedTrack {
    let mut annotated = Vec::with_capacity(points.len());
    let mut total_distance_m = 0.0;

    let Some(first) = points.first() else {
        return AnnotatedTrack { points: annotated, total_distance_m };
    };
    annotated.push(AnnotatedPoint::from_track(first, 0.0, 0.0));

    for pair in points.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let dist = haversine_m(prev.latitude, prev.longitude, cur.latitude, cur.longitude);
        let dt = (cur.timestamp_ms.saturating_sub(prev.timestamp_ms) as f64 / 1000.0).max(MIN_INTERVAL_S);
        let speed_kmh = (dist / 1000.0) / (dt / 3600.0);

        total_distance_m += dist;
        annotated.push(AnnotatedPoint::from_track(cur, dist, speed_kmh));
    }

    AnnotatedTrack { points: annotated, total_distance_m }
}
