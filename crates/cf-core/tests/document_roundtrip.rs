//! Integration tests: project document decode → encode → decode.
//!
//! Verifies that saved canvases survive a full trip through the persisted
//! JSON form and that malformed files are rejected without partial results.

use cf_core::document::{ValidationError, decode, encode_at, to_json};
use cf_core::id::NodeId;
use cf_core::lint::lint_scene;
use cf_core::model::*;
use cf_core::transform::absolute_position;
use chrono::DateTime;
use pretty_assertions::assert_eq;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn roadmap() -> Scene {
    let input = include_str!("fixtures/roadmap.json");
    decode(input.as_bytes()).expect("fixture decodes").into_scene()
}

// ─── Fixture decoding ───────────────────────────────────────────────────

#[test]
fn fixture_decodes_every_field() {
    init_logger();
    let doc = decode(include_bytes!("fixtures/roadmap.json")).unwrap();
    assert_eq!(doc.format_version, "1.0.0");
    assert_eq!(doc.saved_at_epoch_ms, 1_717_171_717_000);
    assert_eq!(doc.nodes.len(), 6);
    assert_eq!(doc.edges.len(), 2);

    let scene = doc.into_scene();
    let deep = scene.node(NodeId::intern("task_deep")).unwrap();
    assert_eq!(deep.parent_id(), Some(NodeId::intern("group_inner")));
    assert_eq!(deep.data.status, Some(Status::InProgress));

    let logo = scene.node(NodeId::intern("image_logo")).unwrap();
    assert_eq!(logo.kind, NodeKind::Image);
    assert_eq!(logo.data.link.as_deref(), Some("/assets/logo.png"));
    assert_eq!(
        logo.handles,
        Some(HandleSides {
            source: Side::Right,
            target: Side::Left
        })
    );

    let arrow = scene.edge(NodeId::intern("edge_setup_deep")).unwrap();
    assert_eq!(arrow.end_marker, Some(EndMarker::Arrow));
    assert!(scene.node(NodeId::intern("note_readme")).unwrap().selected);
}

#[test]
fn nested_positions_resolve_through_ancestors() {
    let scene = roadmap();
    // group_phase1 (100,100) + group_inner (20,40) + task_deep (10,10)
    assert_eq!(
        absolute_position(&scene.nodes, NodeId::intern("task_deep")),
        Some(Point::new(130.0, 150.0))
    );
    assert_eq!(
        absolute_position(&scene.nodes, NodeId::intern("note_readme")),
        Some(Point::new(600.5, 50.25))
    );
}

#[test]
fn fixture_is_lint_clean() {
    assert!(lint_scene(&roadmap()).is_empty());
}

// ─── Round trip ─────────────────────────────────────────────────────────

#[test]
fn roundtrip_preserves_nodes_and_edges() {
    init_logger();
    let scene = roadmap();
    let at = DateTime::from_timestamp_millis(1_720_000_000_000).unwrap();
    let doc = encode_at(&scene, at);
    let text = to_json(&doc).unwrap();

    let back = decode(text.as_bytes()).unwrap();
    assert_eq!(back.saved_at_epoch_ms, 1_720_000_000_000);
    assert_eq!(back.into_scene(), scene);
}

#[test]
fn roundtrip_keeps_awkward_floats() {
    let id = NodeId::intern("float_node");
    let node = Node::new(id, NodeKind::Generic, Point::new(0.1 + 0.2, -1.0 / 3.0))
        .with_data(NodeData::labeled("π ≈ 3.14159"));
    let scene = Scene::new(vec![node], Vec::new());

    let text = to_json(&encode_at(&scene, DateTime::UNIX_EPOCH)).unwrap();
    let back = decode(text.as_bytes()).unwrap().into_scene();
    assert_eq!(back, scene);
}

#[test]
fn missing_optional_fields_default() {
    let text = r#"{
        "formatVersion": "1.0.0",
        "savedAtEpochMs": 5,
        "nodes": [{ "id": "bare", "kind": "generic", "position": { "x": 1, "y": 2 }, "data": { "label": "Bare" } }],
        "edges": [{ "id": "bare_edge", "sourceNodeId": "bare", "targetNodeId": "bare" }]
    }"#;
    let scene = decode(text.as_bytes()).unwrap().into_scene();
    let node = &scene.nodes[0];
    assert!(!node.selected);
    assert_eq!(node.size, None);
    assert_eq!(node.placement, Placement::Absolute(Point::new(1.0, 2.0)));
    assert!(!scene.edges[0].selected);
    assert_eq!(scene.edges[0].end_marker, None);
}

// ─── Rejection ──────────────────────────────────────────────────────────

#[test]
fn syntax_errors_are_reported() {
    let err = decode(b"{ not json").unwrap_err();
    assert!(matches!(err, ValidationError::Syntax(_)));
}

#[test]
fn unknown_kind_fails_the_whole_document() {
    let text = r#"{
        "formatVersion": "1.0.0",
        "savedAtEpochMs": 5,
        "nodes": [
            { "id": "ok", "kind": "generic", "position": { "x": 0, "y": 0 }, "data": { "label": "ok" } },
            { "id": "bad", "kind": "hexagon", "position": { "x": 0, "y": 0 }, "data": { "label": "bad" } }
        ],
        "edges": []
    }"#;
    match decode(text.as_bytes()).unwrap_err() {
        ValidationError::InvalidRecord { field, index, .. } => {
            assert_eq!(field, "nodes");
            assert_eq!(index, 1);
        }
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn missing_edges_array_is_rejected() {
    let text = r#"{ "formatVersion": "1.0.0", "savedAtEpochMs": 1, "nodes": [] }"#;
    assert_eq!(
        decode(text.as_bytes()).unwrap_err(),
        ValidationError::MissingField("edges")
    );
}
