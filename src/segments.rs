//! Ride and stop aggregation over runs.
//!
//! Runs shorter than the relevant minimum duration are dropped without a
//! trace; this is how brief halts and GPS jitter are suppressed.

use log::debug;
use serde::Serialize;
use crate::annotate::AnnotatedPoint;
use crate::geo_utils::{compute_center, max_distance_from};
use crate::segmentation::Run;
use crate::GpsPoint;

/// A moving run that passed the minimum ride duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    /// 1-based, sequential in scan order
    pub id: u32,
    pub start_idx: usize,
    /// Inclusive
    pub end_idx: usize,
    /// Epoch milliseconds
    pub start_time: i64,
    pub end_time: i64,
    pub distance_m: f64,
    pub duration_s: f64,
    /// Non-finite when `duration_s` is zero
    pub avg_speed_kmh: f64,
}

/// A stationary run that passed the minimum stop duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// 1-based, sequential in scan order
    pub id: u32,
    pub start_idx: usize,
    /// Inclusive
    pub end_idx: usize,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_s: f64,
    /// Unweighted mean of the run's coordinates
    pub centroid: GpsPoint,
    /// Farthest distance from any point of the run to the centroid
    pub radius_m: f64,
}

/// Elapsed seconds between the run's boundary points.
fn run_duration_s(points: &[AnnotatedPoint], run: &Run) -> f64 {
    points[run.end].timestamp_ms.saturating_sub(points[run.start].timestamp_ms) as f64 / 1000.0
}

/// Build a ride from a moving run, or `None` if it is too short.
///
/// Distance sums `dist_m` over `(start, end]`. A zero-duration run that is
/// still accepted (e.g. `min_duration_s == 0`) yields a NaN or infinite
/// average speed; callers must tolerate it.
pub fn build_ride(points: &[AnnotatedPoint], run: &Run, id: u32, min_duration_s: f64) -> Option<Ride> {
    let duration_s = run_duration_s(points, run);
    if duration_s < min_duration_s {
        debug!(
            "[Segments] Dropping moving run {}..={} ({:.0}s < {:.0}s)",
            run.start, run.end, duration_s, min_duration_s
        );
        return None;
    }

    let distance_m: f64 = points[run.start + 1..=run.end].iter().map(|p| p.dist_m).sum();

    Some(Ride {
        id,
        start_idx: run.start,
        end_idx: run.end,
        start_time: points[run.start].timestamp_ms,
        end_time: points[run.end].timestamp_ms,
        distance_m,
        duration_s,
        avg_speed_kmh: (distance_m / 1000.0) / (duration_s / 3600.0),
    })
}

/// Build a stop from a stationary run, or `None` if it is too short.
pub fn build_stop(points: &[AnnotatedPoint], run: &Run, id: u32, min_duration_s: f64) -> Option<Stop> {
    let duration_s = run_duration_s(points, run);
    if duration_s < min_duration_s {
        debug!(
            "[Segments] Dropping stationary run {}..={} ({} points, {:.0}s < {:.0}s)",
            run.start, run.end, run.point_count(), duration_s, min_duration_s
        );
        return None;
    }

    let members = &points[run.start..=run.end];
    let centroid = compute_center(members);
    let radius_m = max_distance_from(members, &centroid);

    Some(Stop {
        id,
        start_idx: run.start,
        end_idx: run.end,
        start_time: points[run.start].timestamp_ms,
        end_time: points[run.end].timestamp_ms,
        duration_s,
        centroid,
        radius_m,
    })
}
