//! Session I/O tests
//!
//! Covers capture session files on disk, loosely typed record ingest and the
//! TOML configuration that drives a synthesis run.

use serde_json::json;
use step_synth::app::config::Config;
use step_synth::capture::{parse_events, parse_observations};
use step_synth::workflow::session::CURRENT_FORMAT_VERSION;
use step_synth::{Action, CaptureSession, Error, Event, EventKind, Observation, StepSynthesizer};
use tempfile::TempDir;

/// Create a session covering a short form-filling task
fn form_session() -> CaptureSession {
    let mut session = CaptureSession::new(
        "fill-signup".to_string(),
        Some("Create an account".to_string()),
    );
    session.add_event(Event::click(1.0, 300.0, 220.0));
    for (i, c) in "alice".chars().enumerate() {
        session.add_event(Event::key_press(1.2 + 0.1 * i as f64, c.to_string()));
    }
    session.add_event(Event::click(6.0, 300.0, 420.0));
    session.add_event(Event::click(6.1, 300.0, 420.0));
    session.add_observation(
        Observation::new(1.1)
            .with_caption("Signup form")
            .with_ocr_text("Username  Email  Password"),
    );
    session.add_observation(Observation::new(6.2).with_caption("Welcome page"));
    session
}

#[test]
fn test_session_file_roundtrip_preserves_synthesis() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("signup.json");

    let session = form_session();
    session.save(&path).expect("Failed to save session");
    let loaded = CaptureSession::load(&path).expect("Failed to load session");

    assert_eq!(loaded.metadata.name, "fill-signup");
    assert_eq!(loaded.metadata.goal.as_deref(), Some("Create an account"));
    assert_eq!(loaded.metadata.format_version, CURRENT_FORMAT_VERSION);

    let synthesizer = StepSynthesizer::new(Default::default()).unwrap();
    let before = session.synthesize(&synthesizer).unwrap();
    let after = loaded.synthesize(&synthesizer).unwrap();
    assert_eq!(before, after);

    assert_eq!(after.steps.len(), 2);
    assert_eq!(after.steps[0].step.action, Action::Fill);
    assert_eq!(after.steps[1].step.action, Action::Click);
}

#[test]
fn test_session_written_by_hand_loads() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("hand.json");
    let document = json!({
        "metadata": {"name": "hand-written"},
        "events": [
            {"t": 0.0, "type": "mouse_down", "x": 5, "y": 7},
            {"t": 0.3, "type": "click", "coordinates": [5, 7]},
            {"t": 0.4, "type": "swipe", "extra": {"fingers": 3}}
        ],
        "observations": [
            {"t": 0.2, "caption": "Launcher", "ocr_text": null},
            {"t": 9.0}
        ]
    });
    std::fs::write(&path, document.to_string()).unwrap();

    let session = CaptureSession::load(&path).unwrap();
    assert_eq!(session.metadata.name, "hand-written");
    assert_eq!(session.events.len(), 3);
    assert_eq!(session.events[0].kind, EventKind::Click);
    assert_eq!(session.events[0].coordinates, Some((5.0, 7.0)));
    assert_eq!(session.events[1].coordinates, Some((5.0, 7.0)));
    assert_eq!(session.events[2].kind, EventKind::Other("swipe".to_string()));
    assert!(session.observations[0].ocr_text.is_none());
    assert!(session.observations[1].caption.is_none());
}

#[test]
fn test_old_format_version_still_loads() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("old.json");
    let document = json!({
        "metadata": {"name": "legacy", "format_version": "0.9"},
        "events": [{"t": 1.0, "type": "scroll"}, {"t": 1.2, "type": "scroll"}],
        "observations": []
    });
    std::fs::write(&path, document.to_string()).unwrap();

    let session = CaptureSession::load(&path).unwrap();
    assert_eq!(session.metadata.format_version, "0.9");
    assert_eq!(session.len(), 2);
}

#[test]
fn test_malformed_records_name_stream_and_index() {
    let events = vec![json!({"t": 0.0, "type": "click"}), json!({"type": "click"})];
    match parse_events(&events) {
        Err(Error::InvalidRecord { index, .. }) => assert_eq!(index, 1),
        other => panic!("Expected InvalidRecord, got {:?}", other),
    }

    let observations = vec![json!({"t": "soon", "caption": "x"})];
    let err = parse_observations(&observations).unwrap_err();
    assert!(err.to_string().contains("observation"));
    assert!(err.to_string().contains('0'));
}

#[test]
fn test_truncated_session_file_is_serialization_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, r#"{"events": [{"t": 1.0"#).unwrap();

    assert!(matches!(
        CaptureSession::load(&path),
        Err(Error::Serialization(_))
    ));
}

#[test]
fn test_config_file_drives_synthesis() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[bursts]
burst_threshold = 10.0
burst_min_events = 2

[report]
min_confidence = 0.7
"#,
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.report.min_confidence, 0.7);

    // with a 10s threshold the whole form task is one burst
    let synthesizer = StepSynthesizer::new(config.synthesis()).unwrap();
    let output = form_session().synthesize(&synthesizer).unwrap();
    let with_events = output.steps.iter().filter(|s| s.step.has_events()).count();
    assert_eq!(with_events, 1);
}

#[test]
fn test_config_set_persists_through_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    Config::default().save(&config_path).unwrap();
    let updated = Config::load(&config_path)
        .unwrap()
        .with_value("alignment.emit_unmatched_observations", "false")
        .unwrap();
    updated.save(&config_path).unwrap();

    let reloaded = Config::load(&config_path).unwrap();
    assert!(!reloaded.alignment.emit_unmatched_observations);
    assert_eq!(
        reloaded.get("alignment.emit_unmatched_observations").unwrap().as_deref(),
        Some("false")
    );
}
