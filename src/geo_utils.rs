//! # Geographic Utilities
//!
//! Core geographic computation utilities for track segmentation.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_m`] | Great-circle distance between two lat/lon pairs |
//! | [`haversine_distance`] | Same, for two [`GpsPoint`]s |
//! | [`compute_bounds`] | Bounding box of a track |
//! | [`compute_center`] | Unweighted centroid of a track |
//! | [`max_distance_from`] | Largest distance from any point to a reference |
//!
//! ## Example
//!
//! ```rust
//! use trip_segmenter::{GpsPoint, geo_utils};
//!
//! let track = vec![
//!     GpsPoint::new(52.0907, 5.1214),  // Utrecht
//!     GpsPoint::new(52.0920, 5.1230),
//!     GpsPoint::new(52.0935, 5.1250),
//! ];
//!
//! let center = geo_utils::compute_center(&track);
//! println!("Center: {:.4}, {:.4}", center.latitude, center.longitude);
//!
//! let bounds = geo_utils::compute_bounds(&track);
//! println!("Bounds: {:.4}N to {:.4}N", bounds.min_lat, bounds.max_lat);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! Distances use the haversine formula on a spherical Earth with radius
//! 6,371,000 m. The intermediate `a` term is clamped to `[0, 1]` so that
//! rounding never produces a NaN for near-antipodal or coincident points.
//!
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)
//!
//! ### Coordinate System
//!
//! All functions expect WGS84 coordinates (latitude/longitude in degrees).

use geo::{BoundingRect, MultiPoint, Point};
use crate::{Bounds, GpsPoint, TrackPoint};

/// Spherical Earth radius used for all distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Anything with a latitude/longitude position.
pub trait HasPosition {
    fn position(&self) -> GpsPoint;
}

impl HasPosition for GpsPoint {
    #[inline]
    fn position(&self) -> GpsPoint {
        *self
    }
}

impl HasPosition for TrackPoint {
    #[inline]
    fn position(&self) -> GpsPoint {
        TrackPoint::position(self)
    }
}

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance in meters between two lat/lon pairs (degrees).
///
/// # Example
///
/// ```rust
/// use trip_segmenter::geo_utils;
///
/// // London to Paris
/// let d = geo_utils::haversine_m(51.5074, -0.1278, 48.8566, 2.3522);
/// assert!((d - 343_500.0).abs() < 1000.0);
/// ```
#[inline]
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Calculate the great-circle distance between two GPS points.
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    haversine_m(p1.latitude, p1.longitude, p2.latitude, p2.longitude)
}

/// Largest great-circle distance from any point to `reference`.
///
/// Returns 0.0 for empty input.
pub fn max_distance_from<P: HasPosition>(points: &[P], reference: &GpsPoint) -> f64 {
    points
        .iter()
        .map(|p| haversine_distance(&p.position(), reference))
        .fold(0.0, f64::max)
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a track.
///
/// For empty input this returns [`Bounds::EMPTY`], an inverted box
/// (`min_lat = 90`, `max_lat = -90`, `min_lng = 180`, `max_lng = -180`)
/// that callers treat as "no data" rather than an error.
///
/// # Example
///
/// ```rust
/// use trip_segmenter::{GpsPoint, geo_utils};
///
/// let track = vec![
///     GpsPoint::new(51.5000, -0.1300),
///     GpsPoint::new(51.5100, -0.1200),
///     GpsPoint::new(51.5050, -0.1250),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&track);
/// assert_eq!(bounds.to_array(), [-0.1300, 51.5000, -0.1200, 51.5100]);
/// ```
pub fn compute_bounds<P: HasPosition>(points: &[P]) -> Bounds {
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|p| {
            let pos = p.position();
            Point::new(pos.longitude, pos.latitude)
        })
        .collect();

    match multi.bounding_rect() {
        Some(rect) => Bounds {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lng: rect.min().x,
            max_lng: rect.max().x,
        },
        None => Bounds::EMPTY,
    }
}

// =============================================================================
// Center/Centroid Functions
// =============================================================================

/// Arithmetic mean of all latitudes and longitudes.
///
/// Not distance-weighted and not antimeridian-aware. Returns (0, 0) for
/// empty input.
pub fn compute_center<P: HasPosition>(points: &[P]) -> GpsPoint {
    if points.is_empty() {
        return GpsPoint::new(0.0, 0.0);
    }

    let (sum_lat, sum_lng) = points.iter().fold((0.0, 0.0), |(lat, lng), p| {
        let pos = p.position();
        (lat + pos.latitude, lng + pos.longitude)
    });
    let n = points.len() as f64;

    GpsPoint::new(sum_lat / n, sum_lng / n)
}

// =============================================================================
// Unit Tests
// =============================================================================
