use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use vibecite::error::VibeciteError;
use vibecite::session::{Session, Vibe, STATE_FILE_NAME};

#[test]
fn test_load_missing_file_returns_empty_session() {
    let dir = tempdir().unwrap();
    let session = Session::load(dir.path()).unwrap();
    assert!(session.vibes.is_empty());
    assert!(session.current_bib.is_none());
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempdir().unwrap();

    let mut session = Session::default();
    session.add_vibe("graph neural networks");
    session.add_vibe("attention mechanisms");
    session.vibes[0].results = Some("@article{gnn2019, title={GNN}}".to_string());
    session.vibes[0].raw_results = Some("raw response".to_string());
    session.current_bib = Some(PathBuf::from("/tmp/refs.bib"));
    session.save(dir.path()).unwrap();

    let loaded = Session::load(dir.path()).unwrap();
    assert_eq!(loaded.vibes.len(), 2);
    assert_eq!(loaded.vibes[0].description, "graph neural networks");
    assert_eq!(loaded.vibes[1].description, "attention mechanisms");
    assert_eq!(
        loaded.vibes[0].results.as_deref(),
        Some("@article{gnn2019, title={GNN}}")
    );
    assert_eq!(loaded.vibes[0].raw_results.as_deref(), Some("raw response"));
    assert!(loaded.vibes[1].results.is_none());
    assert_eq!(loaded.current_bib, Some(PathBuf::from("/tmp/refs.bib")));
}

#[test]
fn test_vibes_keep_insertion_order() {
    let dir = tempdir().unwrap();

    let mut session = Session::default();
    for i in 0..5 {
        session.add_vibe(format!("topic {i}"));
    }
    session.save(dir.path()).unwrap();

    let loaded = Session::load(dir.path()).unwrap();
    let descriptions: Vec<&str> = loaded
        .vibes
        .iter()
        .map(|vibe| vibe.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec!["topic 0", "topic 1", "topic 2", "topic 3", "topic 4"]
    );
}

#[test]
fn test_malformed_json_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(STATE_FILE_NAME), "{not json at all").unwrap();

    let result = Session::load(dir.path());
    assert!(matches!(
        result.unwrap_err(),
        VibeciteError::MalformedSession { .. }
    ));
}

#[test]
fn test_state_file_is_pretty_json() {
    let dir = tempdir().unwrap();

    let mut session = Session::default();
    session.add_vibe("quantum error correction");
    session.save(dir.path()).unwrap();

    let content = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(value.get("vibes").and_then(|v| v.as_array()).is_some());
    assert_eq!(
        value["vibes"][0]["description"],
        "quantum error correction"
    );
}

#[test]
fn test_clear_removes_state_file() {
    let dir = tempdir().unwrap();

    Session::default().save(dir.path()).unwrap();
    assert!(dir.path().join(STATE_FILE_NAME).exists());

    Session::clear(dir.path()).unwrap();
    assert!(!dir.path().join(STATE_FILE_NAME).exists());
}

#[test]
fn test_clear_without_state_file_is_ok() {
    let dir = tempdir().unwrap();
    Session::clear(dir.path()).unwrap();
}

#[test]
fn test_has_results() {
    let mut vibe = Vibe::new("diffusion models");
    assert!(!vibe.has_results());
    vibe.results = Some("@misc{d, title={D}}".to_string());
    assert!(vibe.has_results());
}
