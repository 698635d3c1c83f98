//! Deduplication scenarios over interchange documents

use dedupe_core::{DedupeConfig, Deduplicator, OverlapMode};
use pretty_assertions::assert_eq;
use shared_types::{InterchangeDocument, Origin, RedactError};

const DOCUMENT: &str = r#"{
    "schema_version": "1",
    "source": {"path": "contract.pdf"},
    "content": {"plain_text": "田中太郎東京都新宿区"},
    "detections": {
        "plain": [
            {"text": "田中太郎", "entity": "PERSON", "start": 0, "end": 4, "origin": "auto"},
            {"text": "田中太郎", "entity": "PERSON", "start": 0, "end": 4, "origin": "manual"},
            {"text": "東京都", "entity": "LOCATION", "start": 4, "end": 7, "origin": "auto"},
            {"text": "東京都新宿区", "entity": "LOCATION", "start": 4, "end": 10, "origin": "auto"}
        ],
        "structured": [
            {"text": "田中", "entity": "PERSON", "page": 1, "quads": [[0, 0, 10, 10]], "origin": "auto"},
            {"text": "田中太郎", "entity": "PERSON", "page": 1, "quads": [[5, 5, 15, 15]], "origin": "auto"},
            {"text": "田中太郎", "entity": "PERSON", "page": 2, "quads": [[5, 5, 15, 15]], "origin": "auto"}
        ]
    }
}"#;

fn config_from_toml(toml: &str) -> DedupeConfig {
    DedupeConfig::from_str(toml).unwrap()
}

#[test]
fn test_exact_origin_tie_break_keeps_manual() {
    let doc = InterchangeDocument::from_json(DOCUMENT).unwrap();
    let config = config_from_toml(
        r#"
        overlap_mode = "exact"
        tie_break = ["origin"]
        origin_order = ["manual", "addition", "auto"]
        "#,
    );

    let out = Deduplicator::new(config).run(&doc.detection_set().unwrap()).unwrap();

    let persons: Vec<_> = out.plain.iter().filter(|d| d.entity == "PERSON").collect();
    assert_eq!(persons.len(), 1);
    assert_eq!(persons[0].origin, Origin::Manual);
    // The two LOCATION spans differ, so exact keeps both
    assert_eq!(out.plain.len(), 3);
}

#[test]
fn test_contain_with_default_ranking_keeps_full_address() {
    let doc = InterchangeDocument::from_json(DOCUMENT).unwrap();
    let config = DedupeConfig::default().with_overlap_mode(OverlapMode::Contain);

    let out = Deduplicator::new(config).run(&doc.detection_set().unwrap()).unwrap();

    let texts: Vec<_> = out.plain.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(texts, vec!["田中太郎", "東京都新宿区"]);
    assert_eq!(out.plain[0].origin, Origin::Manual);
}

#[test]
fn test_structured_overlap_only_within_page() {
    let doc = InterchangeDocument::from_json(DOCUMENT).unwrap();
    let out = Deduplicator::default().run(&doc.detection_set().unwrap()).unwrap();

    assert_eq!(out.structured.len(), 2);
    assert_eq!(out.structured[0].page, 1);
    assert_eq!(out.structured[1].page, 2);
}

#[test]
fn test_round_trip_through_interchange_keeps_ids() {
    let mut doc = InterchangeDocument::from_json(DOCUMENT).unwrap();
    let set = doc.detection_set().unwrap();
    let out = Deduplicator::default().run(&set).unwrap();

    doc.set_detections(&out);
    let reparsed = InterchangeDocument::from_json(&doc.to_json().unwrap()).unwrap();
    let again = reparsed.detection_set().unwrap();

    assert_eq!(again, out);
}

#[test]
fn test_rerun_produces_identical_ids() {
    let first = InterchangeDocument::from_json(DOCUMENT).unwrap().detection_set().unwrap();
    let second = InterchangeDocument::from_json(DOCUMENT).unwrap().detection_set().unwrap();

    let ids = |set: &shared_types::DetectionSet| {
        set.clone()
            .into_detections()
            .iter()
            .map(|d| d.id().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_malformed_quads_rejected_before_dedupe() {
    let json = DOCUMENT.replace("[[0, 0, 10, 10]]", "[[10, 0, 0, 10]]");
    let doc = InterchangeDocument::from_json(&json).unwrap();

    assert!(matches!(doc.detection_set(), Err(RedactError::Validation(_))));
}
