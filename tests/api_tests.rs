mod common;

use common::{semitone, straight_landmarks};
use perfscore::api::{analyze_bundle, report_document, Extracted, MeasurementBundle};
use perfscore::error::PerfError;
use perfscore::scorer::{Engine, HandCapability, Severity};
use serde_json::{json, Value};

fn bundle_json() -> Value {
    let pitch: Vec<Value> = (0..40)
        .map(|i| {
            if i % 4 == 3 {
                json!({ "time": i as f64 * 0.01, "frequency": null, "voiced": false })
            } else {
                json!({ "time": i as f64 * 0.01, "frequency": semitone(i % 12), "voiced": true })
            }
        })
        .collect();
    let energy: Vec<f64> = (0..=100).map(|i| 0.2 + 0.008 * i as f64).collect();
    let landmarks: Vec<Value> = straight_landmarks()
        .iter()
        .map(|l| json!({ "x": l.x / 3.0, "y": 0.123456, "z": 0.0 }))
        .collect();

    json!({
        "taskId": "rec-42",
        "duration": 12.345,
        "pitch": pitch,
        "onsets": { "onsets": [0.0, 0.5, 1.0, 1.5, 2.0], "tempoBpm": 120.0 },
        "energy": energy,
        "hands": {
            "totalFrames": 12,
            "frames": [
                { "frameIndex": 0, "hands": [{ "hand": "left", "angles": { "thumb": 145.0, "index": 150.0 } }] },
                { "frameIndex": 5, "hands": [] },
                { "frameIndex": 10, "hands": [{ "hand": "right", "landmarks": landmarks }] }
            ]
        }
    })
}

fn bundle(value: Value) -> MeasurementBundle {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_bundle_parses_failed_and_ready_axes() {
    let mut value = bundle_json();
    value["energy"] = json!({ "error": "ffmpeg: no audio stream" });
    let parsed = bundle(value);

    assert!(matches!(parsed.pitch, Extracted::Ready(_)));
    assert_eq!(
        parsed.energy,
        Extracted::Failed {
            error: "ffmpeg: no audio stream".to_string()
        }
    );
}

#[test]
fn test_full_bundle_report() {
    let report = analyze_bundle(&Engine::default(), bundle(bundle_json())).unwrap();

    assert_eq!(report.duration, Some(12.3));
    assert_eq!(report.pitch.score, 100);
    assert_eq!(report.rhythm.score, 100);
    assert_eq!(report.dynamics.score, 86);
    // 40 + 35 + 21.5
    assert_eq!(report.audio_score, 97);

    let hand = &report.hand;
    assert_eq!(hand.frame_count, 12);
    assert_eq!(hand.detected_frames, 2);
    // Landmarks along a line give 180° for every finger.
    assert_eq!(hand.finger_averages.pinky, Some(180.0));
    assert_eq!(hand.hand_points.len(), 1);
    assert_eq!(hand.hand_points[0].frame_index, 10);
    assert_eq!(hand.hand_points[0].landmarks[1].x, 0.3333);
    assert_eq!(hand.hand_points[0].landmarks[0].y, 0.1235);

    assert!(report.overall_score <= 100);
    assert!(report
        .issues
        .iter()
        .any(|i| i.title == "Low hand-detection rate"));
}

#[test]
fn test_report_document_layout() {
    let doc = report_document(&Engine::default(), bundle(bundle_json())).unwrap();
    let value = serde_json::to_value(&doc).unwrap();

    for key in [
        "taskId",
        "duration",
        "overallScore",
        "audioScore",
        "pitchAccuracy",
        "rhythmAccuracy",
        "dynamics",
        "handScore",
        "handDetected",
        "pitchCurve",
        "beatAlignment",
        "handPoints",
        "issues",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["taskId"], "rec-42");
    assert_eq!(value["pitchCurve"].as_array().unwrap().len(), 30);
    assert_eq!(value["beatAlignment"][1]["time"], 0.5);
    assert_eq!(value["handPoints"][0]["frameIndex"], 10);
    assert_eq!(value["issues"][0]["severity"], "warning");
}

#[test]
fn test_failed_axis_does_not_abort() {
    let mut value = bundle_json();
    value["onsets"] = json!({ "error": "onset detector crashed" });
    let report = analyze_bundle(&Engine::default(), bundle(value)).unwrap();

    assert_eq!(report.rhythm.score, 0);
    assert!(report.rhythm.beats().is_empty());
    let failure = &report.issues[0];
    assert_eq!(failure.severity, Severity::Error);
    assert_eq!(failure.title, "Rhythm analysis failed");
    assert_eq!(failure.description, "onset detector crashed");
}

#[test]
fn test_failed_hand_extraction() {
    let mut value = bundle_json();
    value["hands"] = json!({ "error": "frame extraction timed out" });
    let report = analyze_bundle(&Engine::default(), bundle(value)).unwrap();

    assert!(!report.hand.hand_detected);
    assert_eq!(report.hand.overall_score, 0);
    // 97 * 0.6
    assert_eq!(report.overall_score, 58);
    assert_eq!(report.issues.last().unwrap().title, "Hand analysis failed");
}

#[test]
fn test_media_failure_aborts() {
    let mut value = bundle_json();
    value["duration"] = json!({ "error": "ffprobe: invalid data found" });
    let err = analyze_bundle(&Engine::default(), bundle(value)).unwrap_err();
    match err {
        PerfError::Media(msg) => assert!(msg.contains("ffprobe")),
        other => panic!("expected media error, got {:?}", other),
    }
}

#[test]
fn test_contract_violation_aborts() {
    let mut value = bundle_json();
    value["onsets"]["onsets"] = json!([1.0, 0.5, 2.0]);
    let err = analyze_bundle(&Engine::default(), bundle(value)).unwrap_err();
    assert!(matches!(err, PerfError::Validation(_)));
}

#[test]
fn test_unavailable_detector_reports_info() {
    let engine = Engine::default().with_hand_capability(HandCapability::Unavailable);
    let report = analyze_bundle(&engine, bundle(bundle_json())).unwrap();

    assert_eq!(report.hand.overall_score, 0);
    assert_eq!(report.hand.frame_count, 12);
    let last = report.issues.last().unwrap();
    assert_eq!(last.severity, Severity::Info);
    assert_eq!(last.title, "Hand analysis unavailable");
}
