//! Tests for KMZ/KML ingestion through the public entry points

use std::io::{Cursor, Write};

use trip_segmenter::kml::{parse_track, parse_track_with_anchor, SYNTHETIC_INTERVAL_MS};
use trip_segmenter::{analyze_track_bytes, AnalyseParams, TrackError};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const TRACK_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
<Document><Placemark><gx:Track>
  <when>2024-05-01T10:00:00Z</when>
  <when>2024-05-01T10:01:00Z</when>
  <when>2024-05-01T10:02:00Z</when>
  <when>2024-05-01T10:03:00Z</when>
  <when>2024-05-01T10:04:00Z</when>
  <when>2024-05-01T10:10:00Z</when>
  <gx:coord>5.00 52.0 1</gx:coord>
  <gx:coord>5.01 52.0 1</gx:coord>
  <gx:coord>5.02 52.0 1</gx:coord>
  <gx:coord>5.03 52.0 1</gx:coord>
  <gx:coord>5.04 52.0 1</gx:coord>
  <gx:coord>5.04 52.0 1</gx:coord>
</gx:Track></Placemark></Document>
</kml>"#;

/// Build an in-memory KMZ holding the given `(name, contents)` entries.
fn kmz(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_kmz_track_is_parsed() {
    let bytes = kmz(&[("doc.kml", TRACK_KML)]);
    let points = parse_track(&bytes).unwrap();
    assert_eq!(points.len(), 6);
    assert_eq!(points[0].timestamp_ms, 1_714_557_600_000);
    assert_eq!(points[5].timestamp_ms, 1_714_557_600_000 + 600_000);
    assert_eq!(points[0].altitude, Some(1.0));
}

#[test]
fn test_first_kml_entry_wins() {
    let other = TRACK_KML.replace("5.00 52.0", "9.00 48.0");
    let bytes = kmz(&[("images/icon.png", "png"), ("a.kml", TRACK_KML), ("b.kml", other.as_str())]);
    let points = parse_track(&bytes).unwrap();
    assert_eq!(points[0].longitude, 5.0);
}

#[test]
fn test_kml_entry_name_is_case_insensitive() {
    let bytes = kmz(&[("notes.txt", "readme"), ("DOC.KML", TRACK_KML)]);
    let points = parse_track(&bytes).unwrap();
    assert_eq!(points.len(), 6);
}

#[test]
fn test_kmz_without_kml_entry() {
    let bytes = kmz(&[("readme.txt", "no track here")]);
    assert!(matches!(parse_track(&bytes), Err(TrackError::MissingKml)));
}

#[test]
fn test_truncated_kmz_is_a_container_error() {
    let mut bytes = kmz(&[("doc.kml", TRACK_KML)]);
    bytes.truncate(20);
    assert!(matches!(parse_track(&bytes), Err(TrackError::Container(_))));
}

#[test]
fn test_coordinate_list_in_kmz() {
    let kml = r#"<kml><Document>
        <Placemark><LineString><coordinates>5.0,52.0 5.1,52.0</coordinates></LineString></Placemark>
        <Placemark><LineString><coordinates>5.2,52.0</coordinates></LineString></Placemark>
    </Document></kml>"#;
    let bytes = kmz(&[("doc.kml", kml)]);
    let points = parse_track_with_anchor(&bytes, 1_000).unwrap();

    let times: Vec<i64> = points.iter().map(|p| p.timestamp_ms).collect();
    assert_eq!(times, vec![1_000, 1_000 + SYNTHETIC_INTERVAL_MS, 1_000 + 2 * SYNTHETIC_INTERVAL_MS]);
    assert_eq!(points[2].longitude, 5.2);
}

#[test]
fn test_analyze_kmz_bytes() {
    let params = AnalyseParams { ride_min_min: 2.0, ..Default::default() };
    let result = analyze_track_bytes(&kmz(&[("doc.kml", TRACK_KML)]), &params).unwrap();

    assert_eq!(result.points.len(), 6);
    assert_eq!(result.rides.len(), 1);
    assert_eq!((result.rides[0].start_idx, result.rides[0].end_idx), (1, 4));
    assert_eq!(result.params, params);
}

#[test]
fn test_single_point_track_is_rejected() {
    let kml = r#"<kml><gx:Track><when>2024-05-01T10:00:00Z</when><gx:coord>5 52</gx:coord></gx:Track></kml>"#;
    let err = analyze_track_bytes(kml.as_bytes(), &AnalyseParams::default()).unwrap_err();
    assert!(matches!(err, TrackError::InsufficientPoints { found: 1, minimum_required: 2 }));
}

#[test]
fn test_document_without_tracks_is_rejected() {
    let kml = "<kml><Document><name>Nothing</name></Document></kml>";
    let err = analyze_track_bytes(kml.as_bytes(), &AnalyseParams::default()).unwrap_err();
    assert!(matches!(err, TrackError::NoTrackData));
}
