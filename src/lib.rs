//! # Trip Segmenter
//!
//! Turns a time-ordered GPS track log into a trip summary: contiguous
//! "ride" (moving) and "stop" (stationary) segments with per-segment
//! metrics, total distance and a bounding box.
//!
//! This library provides:
//! - Per-point distance/speed annotation
//! - Motion classification and gap-aware run splitting
//! - Ride and stop aggregation with minimum-duration filtering
//! - KMZ/KML ingestion (track extension or plain coordinate lists)
//! - A message-passing analysis worker
//!
//! ## Features
//!
//! - **`worker`** - Enable the tokio-backed analysis worker (default)
//! - **`cli`** - Build the `trip-segmenter` command-line tool (default)
//! - **`parallel`** - Enable parallel batch analysis with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use trip_segmenter::{analyze, AnalyseParams, TrackPoint};
//!
//! // Ten minutes moving east, then ten minutes parked
//! let mut points: Vec<TrackPoint> = (0..=10)
//!     .map(|i| TrackPoint::new(i * 60_000, 52.0, 5.0 + i as f64 * 0.01))
//!     .collect();
//! points.extend((11..=20).map(|i| TrackPoint::new(i * 60_000, 52.0, 5.1)));
//!
//! let result = analyze(&points, &AnalyseParams::default());
//! println!("{} rides, {} stops, {:.1} km", result.rides.len(), result.stops.len(),
//!     result.total_distance_m / 1000.0);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackError};

// Distance, bounding box and centroid helpers
pub mod geo_utils;

// Analysis thresholds and default merging
pub mod params;
pub use params::{AnalyseParams, PartialAnalyseParams};

// Per-point distance/speed annotation
pub mod annotate;
pub use annotate::{annotate_points, AnnotatedPoint, AnnotatedTrack};

// Motion classification and run splitting
pub mod segmentation;
pub use segmentation::{split_runs, MotionClassifier, Run};

// Ride and stop builders
pub mod segments;
pub use segments::{build_ride, build_stop, Ride, Stop};

// Orchestrator
pub mod analysis;
pub use analysis::{analyze, analyze_track_bytes, AnalysisResult};

// KMZ / KML ingestion
pub mod kml;
pub use kml::parse_track;

// Request/response protocol and worker
pub mod worker;
#[cfg(feature = "worker")]
pub use worker::TrackWorker;
pub use worker::{process_request, WorkerRequest, WorkerResponse};

// Map export
pub mod geojson;
pub use geojson::to_feature_collection;

// Independent multi-file analysis
pub mod batch;
#[cfg(feature = "parallel")]
pub use batch::analyze_files_parallel;
pub use batch::{analyze_files, FileAnalysis};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use trip_segmenter::GpsPoint;
/// let point = GpsPoint::new(52.0907, 5.1214); // Utrecht
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A raw track fix as produced by the track parser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Epoch milliseconds
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "alt", default)]
    pub altitude: Option<f64>,
}

impl TrackPoint {
    /// Create a track point without altitude.
    pub fn new(timestamp_ms: i64, latitude: f64, longitude: f64) -> Self {
        Self { timestamp_ms, latitude, longitude, altitude: None }
    }

    /// Attach an altitude in meters.
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn position(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }
}

/// Axis-aligned longitude/latitude box.
///
/// Serialized as `[minLon, minLat, maxLon, maxLat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 4]", from = "[f64; 4]")]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Inverted box returned for empty input, signalling "no data".
    pub const EMPTY: Bounds = Bounds {
        min_lat: 90.0,
        max_lat: -90.0,
        min_lng: 180.0,
        max_lng: -180.0,
    };

    /// True for the inverted "no data" box.
    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lng > self.max_lng
    }

    /// `[minLon, minLat, maxLon, maxLat]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(bounds: Bounds) -> Self {
        bounds.to_array()
    }
}

impl From<[f64; 4]> for Bounds {
    fn from([min_lng, min_lat, max_lng, max_lat]: [f64; 4]) -> Self {
        Self { min_lat, max_lat, min_lng, max_lng }
    }
}

// ============================================================================
// Tests
// ============================================================================
