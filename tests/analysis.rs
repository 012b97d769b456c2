//! End-to-end tests for the analysis pipeline

use trip_segmenter::geo_utils::haversine_distance;
use trip_segmenter::{analyze, split_runs, annotate_points, AnalyseParams, Bounds, GpsPoint, TrackPoint};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Deterministic pseudo-random commute: bursts of driving, idling and
/// occasional logging gaps.
fn synthetic_track(seed: u64, len: usize) -> Vec<TrackPoint> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let mut points = Vec::with_capacity(len);
    let (mut t, mut lat, mut lon) = (1_700_000_000_000_i64, 52.09, 5.12);
    for _ in 0..len {
        points.push(TrackPoint::new(t, lat, lon));
        let roll = next();
        t += if roll < 0.05 { 1_800_000 } else { 30_000 + (next() * 60_000.0) as i64 };
        if roll > 0.4 {
            lat += (next() - 0.5) * 0.004;
            lon += (next() - 0.5) * 0.004;
        }
    }
    points
}

fn gap_track() -> Vec<TrackPoint> {
    [0, 60, 120, 720, 780]
        .iter()
        .enumerate()
        .map(|(i, s)| TrackPoint::new(s * 1000, 52.0, 5.0 + i as f64 * 0.001))
        .collect()
}

#[test]
fn test_runs_cover_every_index_in_order() {
    for seed in 1..=20 {
        let points = synthetic_track(seed, 150);
        let track = annotate_points(&points);
        let runs = split_runs(&track.points, &AnalyseParams::default());

        let mut expected_start = 0;
        for run in &runs {
            assert_eq!(run.start, expected_start, "seed {}", seed);
            assert!(run.end >= run.start);
            expected_start = run.end + 1;
        }
        assert_eq!(expected_start, points.len(), "seed {}", seed);
    }
}

#[test]
fn test_accepted_segments_meet_duration_filters() {
    let params = AnalyseParams { ride_min_min: 2.0, stop_min_min: 4.0, ..Default::default() };
    for seed in 1..=20 {
        let result = analyze(&synthetic_track(seed, 200), &params);
        assert!(result.rides.iter().all(|r| r.duration_s >= params.ride_min_s()));
        assert!(result.stops.iter().all(|s| s.duration_s >= params.stop_min_s()));
    }
}

#[test]
fn test_segments_do_not_overlap_and_ids_are_sequential() {
    let result = analyze(&synthetic_track(7, 300), &AnalyseParams::default());

    for (i, ride) in result.rides.iter().enumerate() {
        assert_eq!(ride.id as usize, i + 1);
    }
    for (i, stop) in result.stops.iter().enumerate() {
        assert_eq!(stop.id as usize, i + 1);
    }

    let mut spans: Vec<(usize, usize)> = result
        .rides
        .iter()
        .map(|r| (r.start_idx, r.end_idx))
        .chain(result.stops.iter().map(|s| (s.start_idx, s.end_idx)))
        .collect();
    spans.sort();
    for pair in spans.windows(2) {
        assert!(pair[0].1 < pair[1].0);
    }
}

#[test]
fn test_total_distance_is_independent_of_params() {
    let points = synthetic_track(3, 250);
    let baseline = analyze(&points, &AnalyseParams::default());
    let summed: f64 = baseline.points.iter().map(|p| p.dist_m).sum();
    assert!(approx_eq(baseline.total_distance_m, summed, 1e-6));

    for params in [
        AnalyseParams { v_min_kmh: 0.0, d_min_m: 0.0, ..Default::default() },
        AnalyseParams { v_min_kmh: 500.0, d_min_m: 1e9, ..Default::default() },
        AnalyseParams { gap_split_min: 0.0, ride_min_min: 0.0, ..Default::default() },
    ] {
        assert_eq!(analyze(&points, &params).total_distance_m, baseline.total_distance_m);
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let points = synthetic_track(11, 200);
    let params = AnalyseParams::default();
    assert_eq!(analyze(&points, &params), analyze(&points, &params));
}

#[test]
fn test_gap_splits_continuous_motion_into_two_rides() {
    let params = AnalyseParams {
        v_min_kmh: 1.0,
        d_min_m: 0.0,
        ride_min_min: 0.0,
        gap_split_min: 5.0,
        ..Default::default()
    };
    let result = analyze(&gap_track(), &params);

    assert_eq!(result.rides.len(), 2);
    // The first fix has no preceding interval, so it is never moving
    assert_eq!((result.rides[0].start_idx, result.rides[0].end_idx), (1, 2));
    assert_eq!((result.rides[1].start_idx, result.rides[1].end_idx), (3, 4));
    assert_eq!(result.rides[0].duration_s, 60.0);
    assert_eq!(result.rides[1].duration_s, 60.0);
    assert!(result.stops.is_empty());
}

#[test]
fn test_gap_interval_belongs_to_no_segment() {
    let params = AnalyseParams {
        v_min_kmh: 1.0,
        d_min_m: 0.0,
        ride_min_min: 0.0,
        gap_split_min: 5.0,
        ..Default::default()
    };
    let result = analyze(&gap_track(), &params);
    let covered: f64 = result.rides.iter().map(|r| r.duration_s).sum();
    assert!(covered < 600.0);
}

#[test]
fn test_three_point_stop_at_single_coordinate() {
    let points: Vec<TrackPoint> = [0, 180, 360]
        .iter()
        .map(|s| TrackPoint::new(s * 1000, 52.5, 5.25))
        .collect();
    let result = analyze(&points, &AnalyseParams::default());

    assert!(result.rides.is_empty());
    assert_eq!(result.stops.len(), 1);
    let stop = &result.stops[0];
    assert_eq!(stop.centroid, GpsPoint::new(52.5, 5.25));
    assert_eq!(stop.radius_m, 0.0);
    assert_eq!(stop.duration_s, 360.0);
}

#[test]
fn test_short_stop_is_dropped() {
    let points: Vec<TrackPoint> = [0, 60, 120]
        .iter()
        .map(|s| TrackPoint::new(s * 1000, 52.5, 5.25))
        .collect();
    let result = analyze(&points, &AnalyseParams::default());
    assert!(result.rides.is_empty());
    assert!(result.stops.is_empty());
}

#[test]
fn test_two_point_stop_uses_midpoint() {
    // ~20 m apart in a minute: slow and short enough to be stationary
    let a = TrackPoint::new(0, 52.0, 5.0);
    let b = TrackPoint::new(60_000, 52.00018, 5.0);
    let params = AnalyseParams { stop_min_min: 1.0, ..Default::default() };
    let result = analyze(&[a, b], &params);

    assert_eq!(result.stops.len(), 1);
    let stop = &result.stops[0];
    assert!(approx_eq(stop.centroid.latitude, 52.00009, 1e-9));
    assert!(approx_eq(stop.centroid.longitude, 5.0, 1e-9));

    let to_a = haversine_distance(&stop.centroid, &a.position());
    let to_b = haversine_distance(&stop.centroid, &b.position());
    assert!(approx_eq(to_a, to_b, 1e-6));
    assert!(approx_eq(stop.radius_m, to_a, 1e-6));
}

#[test]
fn test_single_point_bbox() {
    let result = analyze(&[TrackPoint::new(0, 52.0, 5.0)], &AnalyseParams::default());
    assert_eq!(result.bbox.to_array(), [5.0, 52.0, 5.0, 52.0]);
}

#[test]
fn test_empty_input_has_inverted_bbox() {
    let result = analyze(&[], &AnalyseParams::default());
    assert_eq!(result.bbox, Bounds::EMPTY);
    assert!(result.bbox.is_empty());
}

#[test]
fn test_extreme_timestamps_do_not_overflow() {
    let points = vec![
        TrackPoint::new(i64::MIN, 52.0, 5.0),
        TrackPoint::new(i64::MAX, 52.0, 5.1),
        TrackPoint::new(0, 52.0, 5.1),
    ];
    let params = AnalyseParams { ride_min_min: 0.0, stop_min_min: 0.0, ..Default::default() };
    let result = analyze(&points, &params);

    assert_eq!(result.points.len(), 3);
    assert!(result.points.iter().all(|p| p.speed_kmh.is_finite()));
    assert!(result.rides.iter().all(|r| r.duration_s.is_finite()));
    assert!(result.stops.iter().all(|s| s.duration_s.is_finite()));
}

#[test]
fn test_out_of_range_params_degrade_without_error() {
    let points = synthetic_track(5, 100);

    let all_moving = AnalyseParams { v_min_kmh: -1.0, ride_min_min: 0.0, gap_split_min: 1e6, ..Default::default() };
    let result = analyze(&points, &all_moving);
    assert_eq!(result.rides.len(), 1);
    assert_eq!((result.rides[0].start_idx, result.rides[0].end_idx), (1, points.len() - 1));

    let all_still = AnalyseParams { v_min_kmh: 1e9, d_min_m: 1e9, stop_min_min: 0.0, gap_split_min: 1e6, ..Default::default() };
    let result = analyze(&points, &all_still);
    assert!(result.rides.is_empty());
    assert_eq!(result.stops.len(), 1);
}
