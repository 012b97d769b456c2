//! Basic example of splitting a synthetic commute into rides and stops.
//!
//! Run with: cargo run --example basic_analysis

use trip_segmenter::{analyze, AnalyseParams, PartialAnalyseParams, TrackPoint};

const MINUTE_MS: i64 = 60_000;

fn main() {
    // Home -> coffee stop -> office, one fix per minute (Utrecht area)
    let mut points = Vec::new();
    let mut t = 0;
    let mut lon = 5.1214;

    for _ in 0..12 {
        points.push(TrackPoint::new(t, 52.0907, lon));
        lon += 0.006;
        t += MINUTE_MS;
    }
    for _ in 0..8 {
        points.push(TrackPoint::new(t, 52.0907, lon));
        t += MINUTE_MS;
    }
    for _ in 0..10 {
        lon += 0.006;
        points.push(TrackPoint::new(t, 52.0907, lon));
        t += MINUTE_MS;
    }

    let params = AnalyseParams::default();
    println!("Trip Segmentation Example\n");
    println!(
        "Params: vMin={} km/h, dMin={} m, rideMin={} min, stopMin={} min, gapSplit={} min\n",
        params.v_min_kmh, params.d_min_m, params.ride_min_min, params.stop_min_min, params.gap_split_min
    );

    let result = analyze(&points, &params);
    println!("Total distance: {:.2} km", result.total_distance_m / 1000.0);

    for ride in &result.rides {
        println!(
            "  Ride #{}: points {}..={}, {:.2} km in {:.0} s ({:.1} km/h)",
            ride.id,
            ride.start_idx,
            ride.end_idx,
            ride.distance_m / 1000.0,
            ride.duration_s,
            ride.avg_speed_kmh
        );
    }
    for stop in &result.stops {
        println!(
            "  Stop #{}: {:.0} s at ({:.4}, {:.4}), radius {:.1} m",
            stop.id, stop.duration_s, stop.centroid.latitude, stop.centroid.longitude, stop.radius_m
        );
    }

    // A stricter stop threshold drops the coffee break
    let strict = PartialAnalyseParams { stop_min_min: Some(10.0), ..Default::default() }.resolve(&params);
    let strict_result = analyze(&points, &strict);
    println!(
        "\nWith stopMin={} min: {} rides, {} stops",
        strict.stop_min_min,
        strict_result.rides.len(),
        strict_result.stops.len()
    );
}
