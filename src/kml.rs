//! KMZ / KML track ingestion.
//!
//! Produces the ordered `{t, lat, lon, alt?}` sequence the analysis core
//! consumes. Two encodings are understood, in order of preference:
//!
//! 1. **Track extension** (`<gx:Track>` / `<Track>`): each track pairs its
//!    `<when>` timestamps with its `<gx:coord>` positions by index.
//! 2. **Coordinate lists** (`<coordinates>`): `lon,lat[,alt]` tuples with no
//!    timestamps. Times are synthesized one minute apart, anchored at
//!    ingestion time, so that interval logic stays well-defined.
//!
//! Multiple tracks or coordinate lists are concatenated in document order.

use std::io::{Cursor, Read};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, info, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{Result, TrackError};
use crate::TrackPoint;

/// Spacing of synthesized timestamps for untimed coordinate lists.
pub const SYNTHETIC_INTERVAL_MS: i64 = 60_000;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Parse raw file bytes (KMZ archive or KML text) into track points.
///
/// Untimed coordinate lists get timestamps anchored at the current time.
pub fn parse_track(bytes: &[u8]) -> Result<Vec<TrackPoint>> {
    parse_track_with_anchor(bytes, Utc::now().timestamp_millis())
}

/// [`parse_track`] with an explicit anchor (epoch ms) for synthesized times.
pub fn parse_track_with_anchor(bytes: &[u8], anchor_ms: i64) -> Result<Vec<TrackPoint>> {
    let kml = if bytes.starts_with(ZIP_MAGIC) {
        extract_kml(bytes)?
    } else {
        match std::str::from_utf8(bytes) {
            Ok(text) if text.contains("<kml") => text.to_string(),
            _ => {
                return Err(TrackError::Container(
                    "expected a KMZ archive or a KML document".to_string(),
                ))
            }
        }
    };
    parse_kml(&kml, anchor_ms)
}

/// Read the first `.kml` entry (archive order) out of a KMZ archive.
pub fn extract_kml(bytes: &[u8]) -> Result<String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| TrackError::Container(e.to_string()))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| TrackError::Container(e.to_string()))?;
        if !entry.name().to_lowercase().ends_with(".kml") {
            continue;
        }

        debug!("[KmlParser] Reading {} from KMZ ({} bytes)", entry.name(), entry.size());
        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|e| TrackError::Container(e.to_string()))?;
        return Ok(text);
    }

    Err(TrackError::MissingKml)
}

// =============================================================================
// KML document parsing
// =============================================================================

/// Positions and timestamps collected from one track element.
#[derive(Debug, Default)]
struct TrackBuffer {
    whens: Vec<Option<i64>>,
    coords: Vec<Option<(f64, f64, Option<f64>)>>,
}

impl TrackBuffer {
    /// Pair entries by index, dropping pairs with an unusable half.
    fn into_points(self, out: &mut Vec<TrackPoint>) {
        let expected = self.whens.len().max(self.coords.len());
        let before = out.len();

        for (when, coord) in self.whens.into_iter().zip(self.coords) {
            if let (Some(t), Some((lon, lat, alt))) = (when, coord) {
                out.push(TrackPoint { timestamp_ms: t, latitude: lat, longitude: lon, altitude: alt });
            }
        }

        let kept = out.len() - before;
        if kept < expected {
            warn!("[KmlParser] Track had {} unusable or unpaired entries", expected - kept);
        }
    }
}

/// Which element's text is currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    When,
    Coord,
    Coordinates,
}

/// Parse a KML document.
///
/// If any track element is present only tracks are used; otherwise every
/// coordinate list is used with synthesized times starting at `anchor_ms`.
pub fn parse_kml(kml: &str, anchor_ms: i64) -> Result<Vec<TrackPoint>> {
    let mut reader = Reader::from_str(kml);
    reader.config_mut().trim_text(true);

    let mut track_points = Vec::new();
    let mut current_track: Option<TrackBuffer> = None;
    let mut saw_track = false;

    let mut coordinate_lists: Vec<String> = Vec::new();

    let mut capture = Capture::None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            TrackError::Xml(format!("error at position {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(ref e) => {
                capture = Capture::None;
                match e.local_name().as_ref() {
                    b"Track" => {
                        saw_track = true;
                        current_track = Some(TrackBuffer::default());
                    }
                    b"when" if current_track.is_some() => capture = Capture::When,
                    b"coord" if current_track.is_some() => capture = Capture::Coord,
                    b"coordinates" => capture = Capture::Coordinates,
                    _ => {}
                }
                text.clear();
            }

            Event::Text(ref e) => {
                if capture != Capture::None {
                    let unescaped = e.unescape().map_err(|err| TrackError::Xml(err.to_string()))?;
                    text.push_str(&unescaped);
                }
            }

            Event::CData(ref e) => {
                if capture != Capture::None {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }

            // Self-closing <when/> or <gx:coord/> still occupies a slot
            Event::Empty(ref e) => {
                if let Some(track) = current_track.as_mut() {
                    match e.local_name().as_ref() {
                        b"when" => track.whens.push(None),
                        b"coord" => track.coords.push(None),
                        _ => {}
                    }
                }
            }

            Event::End(ref e) => {
                match e.local_name().as_ref() {
                    b"Track" => {
                        if let Some(track) = current_track.take() {
                            track.into_points(&mut track_points);
                        }
                    }
                    b"when" if capture == Capture::When => {
                        if let Some(track) = current_track.as_mut() {
                            track.whens.push(parse_timestamp(&text));
                        }
                    }
                    b"coord" if capture == Capture::Coord => {
                        if let Some(track) = current_track.as_mut() {
                            track.coords.push(parse_track_coord(&text));
                        }
                    }
                    b"coordinates" if capture == Capture::Coordinates => {
                        coordinate_lists.push(std::mem::take(&mut text));
                    }
                    _ => {}
                }
                capture = Capture::None;
                text.clear();
            }

            Event::Eof => break,
            _ => {}
        }
    }

    // An unterminated track in a truncated document still counts
    if let Some(track) = current_track.take() {
        track.into_points(&mut track_points);
    }

    if saw_track {
        info!("[KmlParser] Parsed {} timed points from track elements", track_points.len());
        return Ok(track_points);
    }

    if coordinate_lists.is_empty() {
        return Err(TrackError::NoTrackData);
    }

    let points = synthesize_times(
        coordinate_lists.iter().flat_map(|list| parse_coordinate_list(list)),
        anchor_ms,
    );
    info!(
        "[KmlParser] No track element; {} points from {} coordinate lists at {}s spacing",
        points.len(),
        coordinate_lists.len(),
        SYNTHETIC_INTERVAL_MS / 1000
    );
    Ok(points)
}

/// Parse a KML `<when>` value into epoch milliseconds.
///
/// Accepts RFC 3339, minute-precision date-times with `Z` or a numeric
/// offset, and the `dateTime`, `date`, `gYearMonth` and `gYear` forms.
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.timestamp_millis());
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    // gYear and gYearMonth start at the first day of the period
    let date = match naive.len() {
        4 => format!("{naive}-01-01"),
        7 => format!("{naive}-01"),
        _ => naive.to_string(),
    };
    NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// `<gx:coord>`: space-separated `lon lat [alt]`.
fn parse_track_coord(value: &str) -> Option<(f64, f64, Option<f64>)> {
    let mut parts = value.split_whitespace().map(|s| s.parse::<f64>().ok());
    let lon = parts.next().flatten()?;
    let lat = parts.next().flatten()?;
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    let alt = parts.next().flatten().filter(|a| a.is_finite());
    Some((lon, lat, alt))
}

/// `<coordinates>`: whitespace-separated `lon,lat[,alt]` tuples.
fn parse_coordinate_list(value: &str) -> impl Iterator<Item = (f64, f64, Option<f64>)> + '_ {
    value.split_whitespace().filter_map(|tuple| {
        let mut parts = tuple.split(',').map(|s| s.trim().parse::<f64>().ok());
        let lon = parts.next().flatten()?;
        let lat = parts.next().flatten()?;
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        let alt = parts.next().flatten().filter(|a| a.is_finite());
        Some((lon, lat, alt))
    })
}

fn synthesize_times(
    coords: impl Iterator<Item = (f64, f64, Option<f64>)>,
    anchor_ms: i64,
) -> Vec<TrackPoint> {
    coords
        .enumerate()
        .map(|(i, (lon, lat, alt))| TrackPoint {
            timestamp_ms: anchor_ms + i as i64 * SYNTHETIC_INTERVAL_MS,
            latitude: lat,
            longitude: lon,
            altitude: alt,
        })
        .collect()
}
