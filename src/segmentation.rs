//! # Motion Classification and Run Splitting
//!
//! Partitions an annotated track into maximal runs of uniform motion state.
//!
//! ## Algorithm
//! 1. A point is "moving" when its interval speed exceeds `v_min_kmh` OR its
//!    interval displacement exceeds `d_min_m`. The first point never moves.
//! 2. Starting at index `i`, the run is extended through `j` while the gap
//!    `t[j] - t[j-1]` stays within `gap_split_min` and `moving(j) == moving(j-1)`.
//! 3. The run ends before the first `j` violating either rule; scanning
//!    resumes at `j`. A violation of both rules at once is one split.
//!
//! The scan is O(n) with no backtracking, and the runs it yields are
//! non-overlapping and cover every index in order.

use crate::annotate::AnnotatedPoint;
use crate::AnalyseParams;

/// Decides per point whether the subject is moving.
///
/// A pure function of the annotated data; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct MotionClassifier<'a> {
    points: &'a [AnnotatedPoint],
    v_min_kmh: f64,
    d_min_m: f64,
}

impl<'a> MotionClassifier<'a> {
    pub fn new(points: &'a [AnnotatedPoint], params: &AnalyseParams) -> Self {
        Self {
            points,
            v_min_kmh: params.v_min_kmh,
            d_min_m: params.d_min_m,
        }
    }

    /// Whether the interval ending at `index` counts as movement.
    ///
    /// Speed and displacement are independent signals: either one alone
    /// is enough. Index 0 has no preceding interval and is never moving.
    pub fn is_moving(&self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        self.points
            .get(index)
            .is_some_and(|p| p.speed_kmh > self.v_min_kmh || p.dist_m > self.d_min_m)
    }
}

/// A maximal contiguous index range before duration filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// First index (inclusive)
    pub start: usize,
    /// Last index (inclusive)
    pub end: usize,
    /// Motion state, taken from the start index
    pub moving: bool,
}

impl Run {
    /// Number of points in the run (always at least one).
    pub fn point_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Split an annotated track into runs.
///
/// Inputs with fewer than two points have no interval to compare and
/// produce no runs.
pub fn split_runs(points: &[AnnotatedPoint], params: &AnalyseParams) -> Vec<Run> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let classifier = MotionClassifier::new(points, params);
    let gap_split_s = params.gap_split_s();
    let mut runs = Vec::new();

    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n
            && !exceeds_gap(&points[j - 1], &points[j], gap_split_s)
            && classifier.is_moving(j) == classifier.is_moving(j - 1)
        {
            j += 1;
        }

        runs.push(Run {
            start: i,
            end: j - 1,
            moving: classifier.is_moving(i),
        });
        i = j;
    }

    runs
}

/// Whether the time between two consecutive fixes forces a split.
#[inline]
fn exceeds_gap(prev: &AnnotatedPoint, cur: &AnnotatedPoint, gap_split_s: f64) -> bool {
    cur.timestamp_ms.saturating_sub(prev.timestamp_ms) as f64 / 1000.0 > gap_split_s
}
