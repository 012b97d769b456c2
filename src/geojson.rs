//! GeoJSON export for map rendering.
//!
//! Rides become `LineString` features over their own points and stops
//! become `Point` features at their centroid. Coordinates are `[lon, lat]`.

use serde_json::{json, Value};
use crate::analysis::AnalysisResult;
use crate::segments::{Ride, Stop};

/// Build a `FeatureCollection` of all rides followed by all stops.
///
/// The collection carries the result's bounding box unless the track was empty.
pub fn to_feature_collection(result: &AnalysisResult) -> Value {
    let features: Vec<Value> = result
        .rides
        .iter()
        .map(|ride| ride_feature(result, ride))
        .chain(result.stops.iter().map(stop_feature))
        .collect();

    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if !result.bbox.is_empty() {
        collection["bbox"] = json!(result.bbox.to_array());
    }
    collection
}

fn ride_feature(result: &AnalysisResult, ride: &Ride) -> Value {
    let coordinates: Vec<[f64; 2]> = result
        .ride_points(ride)
        .iter()
        .map(|p| [p.longitude, p.latitude])
        .collect();

    json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": coordinates },
        "properties": {
            "kind": "ride",
            "id": ride.id,
            "startTime": ride.start_time,
            "endTime": ride.end_time,
            "distanceM": ride.distance_m,
            "durationS": ride.duration_s,
            "avgSpeedKmh": ride.avg_speed_kmh,
        },
    })
}

fn stop_feature(stop: &Stop) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [stop.centroid.longitude, stop.centroid.latitude],
        },
        "properties": {
            "kind": "stop",
            "id": stop.id,
            "startTime": stop.start_time,
            "endTime": stop.end_time,
            "durationS": stop.duration_s,
            "radiusM": stop.radius_m,
        },
    })
}
