//! Analysis orchestrator.
//!
//! `ANNOTATE -> SPLIT+CLASSIFY -> AGGREGATE -> DONE`, once per call, with no
//! shared state: identical `(points, params)` always give an identical
//! [`AnalysisResult`]. Interactive callers re-run it on every parameter
//! change, so that determinism is relied upon.

use log::{debug, info};
use serde::Serialize;
use crate::annotate::{annotate_points, AnnotatedPoint};
use crate::error::{ensure_min_points, Result};
use crate::geo_utils::compute_bounds;
use crate::kml::parse_track;
use crate::segmentation::split_runs;
use crate::segments::{build_ride, build_stop, Ride, Stop};
use crate::{AnalyseParams, Bounds, TrackPoint};

/// Structured trip summary for one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Input fixes with per-interval distance and speed
    pub points: Vec<AnnotatedPoint>,
    /// Ordered by id
    pub rides: Vec<Ride>,
    /// Ordered by id
    pub stops: Vec<Stop>,
    pub total_distance_m: f64,
    /// `[minLon, minLat, maxLon, maxLat]` on the wire
    pub bbox: Bounds,
    /// The resolved thresholds actually used
    pub params: AnalyseParams,
}

impl AnalysisResult {
    /// Look up a ride by its 1-based id.
    pub fn ride(&self, id: u32) -> Option<&Ride> {
        self.rides.iter().find(|r| r.id == id)
    }

    /// Look up a stop by its 1-based id.
    pub fn stop(&self, id: u32) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    /// The annotated points belonging to a ride (inclusive range).
    pub fn ride_points(&self, ride: &Ride) -> &[AnnotatedPoint] {
        self.points
            .get(ride.start_idx..=ride.end_idx)
            .unwrap_or_default()
    }

    /// `(epoch ms, km/h)` pairs across a ride, for plotting speed over time.
    pub fn speed_series(&self, ride: &Ride) -> Vec<(i64, f64)> {
        self.ride_points(ride)
            .iter()
            .map(|p| (p.timestamp_ms, p.speed_kmh))
            .collect()
    }

    /// Sum of all accepted ride durations, seconds.
    pub fn moving_time_s(&self) -> f64 {
        self.rides.iter().map(|r| r.duration_s).sum()
    }
}

/// Segment a time-ordered point sequence into rides and stops.
///
/// `params` must already be resolved (defaults merged by the caller).
/// Never fails; degenerate inputs give well-formed empty results.
///
/// # Example
/// ```
/// use trip_segmenter::{analyze, AnalyseParams, TrackPoint};
///
/// // Parked for six minutes
/// let points: Vec<TrackPoint> = (0..=3)
///     .map(|i| TrackPoint::new(i * 120_000, 52.0, 5.0))
///     .collect();
///
/// let result = analyze(&points, &AnalyseParams::default());
/// assert!(result.rides.is_empty());
/// assert_eq!(result.stops.len(), 1);
/// assert_eq!(result.stops[0].radius_m, 0.0);
/// ```
pub fn analyze(points: &[TrackPoint], params: &AnalyseParams) -> AnalysisResult {
    let track = annotate_points(points);
    let runs = split_runs(&track.points, params);

    let ride_min_s = params.ride_min_s();
    let stop_min_s = params.stop_min_s();
    let mut rides: Vec<Ride> = Vec::new();
    let mut stops: Vec<Stop> = Vec::new();

    for run in &runs {
        if run.moving {
            let next_id = rides.len() as u32 + 1;
            if let Some(ride) = build_ride(&track.points, run, next_id, ride_min_s) {
                rides.push(ride);
            }
        } else {
            let next_id = stops.len() as u32 + 1;
            if let Some(stop) = build_stop(&track.points, run, next_id, stop_min_s) {
                stops.push(stop);
            }
        }
    }

    debug!(
        "[Analyze] {} points -> {} runs -> {} rides, {} stops",
        points.len(),
        runs.len(),
        rides.len(),
        stops.len()
    );

    let bbox = compute_bounds(&track.points);

    AnalysisResult {
        points: track.points,
        rides,
        stops,
        total_distance_m: track.total_distance_m,
        bbox,
        params: *params,
    }
}

/// Parse raw KMZ/KML bytes and analyze the recovered track.
///
/// Fails when the container is unreadable, holds no track data, or yields
/// fewer than two usable points.
pub fn analyze_track_bytes(bytes: &[u8], params: &AnalyseParams) -> Result<AnalysisResult> {
    let points = parse_track(bytes)?;
    ensure_min_points(points.len())?;

    let result = analyze(&points, params);
    info!(
        "[Analyze] {:.2} km over {} points: {} rides, {} stops",
        result.total_distance_m / 1000.0,
        result.points.len(),
        result.rides.len(),
        result.stops.len()
    );
    Ok(result)
}
