//! Request/response protocol tests

use serde_json::{json, Value};
use trip_segmenter::{process_request, AnalyseParams, PartialAnalyseParams, WorkerRequest};

const KML: &str = r#"<kml><Document><Placemark><LineString><coordinates>
    5.00,52.0 5.01,52.0 5.02,52.0 5.03,52.0 5.04,52.0 5.04,52.0 5.04,52.0
</coordinates></LineString></Placemark></Document></kml>"#;

fn respond(request: Value) -> Value {
    let request: WorkerRequest = serde_json::from_value(request).unwrap();
    serde_json::to_value(process_request(&request, &AnalyseParams::default())).unwrap()
}

#[test]
fn test_success_response_shape() {
    let response = respond(json!({ "fileBuffer": KML.as_bytes(), "params": {} }));

    assert_eq!(response["ok"], true);
    assert!(response.get("error").is_none());
    let result = &response["result"];
    assert_eq!(result["points"].as_array().unwrap().len(), 7);
    assert_eq!(result["rides"].as_array().unwrap().len(), 1);
    assert_eq!(result["params"], json!({
        "vMinKmh": 2.0, "dMinM": 50.0, "rideMinMin": 3.0, "stopMinMin": 5.0, "gapSplitMin": 20.0
    }));
}

#[test]
fn test_partial_params_are_resolved_against_defaults() {
    let response = respond(json!({
        "fileBuffer": KML.as_bytes(),
        "params": { "rideMinMin": 10 }
    }));
    assert_eq!(response["ok"], true);
    assert_eq!(response["result"]["params"]["rideMinMin"], 10.0);
    assert_eq!(response["result"]["params"]["dMinM"], 50.0);
    assert!(response["result"]["rides"].as_array().unwrap().is_empty());
}

#[test]
fn test_failure_response_carries_only_a_message() {
    let response = respond(json!({ "fileBuffer": b"PK\x03\x04broken".to_vec() }));
    assert_eq!(response["ok"], false);
    assert!(response.get("result").is_none());
    assert!(response["error"].as_str().unwrap().starts_with("could not read track container"));
}

#[test]
fn test_partial_params_roundtrip_omits_unset_fields() {
    let partial = PartialAnalyseParams { gap_split_min: Some(15.0), ..Default::default() };
    assert_eq!(serde_json::to_value(partial).unwrap(), json!({ "gapSplitMin": 15.0 }));
}
