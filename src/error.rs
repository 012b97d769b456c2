//! Error types for track ingestion and analysis.
//!
//! The segmentation core itself never fails; everything here originates at
//! the parsing/worker boundary, where it is rendered into the single
//! `error` string of a [`WorkerResponse`](crate::worker::WorkerResponse).

use thiserror::Error;

/// Minimum number of usable points the core needs (one interval).
pub const MIN_TRACK_POINTS: usize = 2;

/// Errors raised while turning raw file bytes into an analysis.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Bytes are neither a readable KMZ archive nor KML text.
    #[error("could not read track container: {0}")]
    Container(String),

    /// The KMZ archive holds no `.kml` document.
    #[error("no .kml document found in KMZ archive")]
    MissingKml,

    /// The KML document is malformed.
    #[error("failed to parse KML: {0}")]
    Xml(String),

    /// Neither a track element nor a coordinate list was found.
    #[error("no parseable track data found")]
    NoTrackData,

    /// Parsing succeeded but produced too few points to form an interval.
    #[error("found {found} usable track points, at least {minimum_required} required")]
    InsufficientPoints {
        found: usize,
        minimum_required: usize,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A request was posted after the worker task ended.
    #[error("track worker has shut down")]
    WorkerStopped,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Check that a parsed track has enough points for analysis.
pub fn ensure_min_points(found: usize) -> Result<()> {
    if found < MIN_TRACK_POINTS {
        return Err(TrackError::InsufficientPoints {
            found,
            minimum_required: MIN_TRACK_POINTS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackError::InsufficientPoints { found: 1, minimum_required: 2 };
        assert_eq!(
            err.to_string(),
            "found 1 usable track points, at least 2 required"
        );
        assert!(TrackError::MissingKml.to_string().contains(".kml"));
    }

    #[test]
    fn test_ensure_min_points() {
        assert!(ensure_min_points(2).is_ok());
        assert!(matches!(
            ensure_min_points(0),
            Err(TrackError::InsufficientPoints { found: 0, minimum_required: 2 })
        ));
    }
}
