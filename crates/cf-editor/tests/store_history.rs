//! Integration tests: canvas store + history (cf-editor).
//!
//! Drives the store the way the UI does and checks that undo/redo, paste,
//! removal and layout leave the canvas in the expected shape.

use cf_core::document::decode;
use cf_core::id::NodeId;
use cf_core::model::*;
use cf_core::transform::absolute_position;
use cf_editor::layout::{LayoutDirection, LayoutEngine};
use cf_editor::reducer::{EdgeChange, NodeChange, StoreError};
use cf_editor::store::CanvasStore;
use pretty_assertions::assert_eq;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn loaded_store() -> CanvasStore {
    init_logger();
    let doc = decode(include_bytes!("fixtures/roadmap.json")).expect("fixture decodes");
    let mut store = CanvasStore::new();
    store.load_document(doc);
    store
}

fn id(name: &str) -> NodeId {
    NodeId::intern(name)
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn load_orders_parents_first_and_clears_history() {
    let mut store = CanvasStore::new();
    store.add_node(NodeKind::Generic, Point::ORIGIN, None);
    store.add_node(NodeKind::Generic, Point::ORIGIN, None);
    store.undo();
    assert!(store.can_undo());
    assert!(store.can_redo());

    let doc = decode(include_bytes!("fixtures/roadmap.json")).unwrap();
    let first = store.nodes()[0].id;
    store.select(Some(first));
    store.load_document(doc);

    assert!(!store.can_undo());
    assert!(!store.can_redo());
    assert_eq!(store.selected_node(), None);
    let at = |name: &str| store.nodes().iter().position(|n| n.id == id(name)).unwrap();
    assert!(at("group_phase1") < at("task_setup"));
    assert!(at("group_inner") < at("task_deep"));
}

// ─── Undo / redo ────────────────────────────────────────────────────────

#[test]
fn undo_redo_is_exact() {
    let mut store = loaded_store();
    let original = store.scene().clone();

    store.apply_node_changes(vec![NodeChange::Move {
        id: id("note_readme"),
        dx: 40.0,
        dy: -10.0,
    }]);
    let moved = store.scene().clone();
    store.connect(id("task_setup"), id("note_readme"));
    store.update_node_data(
        id("task_deep"),
        NodeDataPatch {
            status: Some(Some(Status::Done)),
            ..Default::default()
        },
    );
    let edited = store.scene().clone();

    assert!(store.undo());
    assert!(store.undo());
    assert_eq!(store.scene(), &moved);
    assert!(store.undo());
    assert_eq!(store.scene(), &original);
    assert!(!store.undo());

    assert!(store.redo());
    assert!(store.redo());
    assert!(store.redo());
    assert_eq!(store.scene(), &edited);
    assert!(!store.redo());
}

#[test]
fn new_mutation_clears_redo() {
    let mut store = loaded_store();
    store.add_node(NodeKind::Markdown, Point::ORIGIN, None);
    store.undo();
    assert!(store.can_redo());

    store.add_node(NodeKind::Generic, Point::ORIGIN, None);
    assert!(!store.can_redo());
}

#[test]
fn drag_gesture_undoes_as_one_step() {
    let mut store = loaded_store();
    let before = store.scene().clone();

    store.begin_gesture();
    for _ in 0..5 {
        store.apply_node_changes(vec![NodeChange::Move {
            id: id("image_logo"),
            dx: 2.0,
            dy: 1.0,
        }]);
    }
    store.end_gesture();

    let logo = store.node(id("image_logo")).unwrap();
    assert_eq!(logo.placement.raw(), Point::new(630.0, 305.0));
    assert!(store.undo());
    assert_eq!(store.scene(), &before);
    assert!(!store.can_undo());
}

#[test]
fn history_depth_is_bounded() {
    let mut store = CanvasStore::with_config(cf_editor::EditorConfig {
        history_depth: 3,
        ..Default::default()
    });
    for i in 0..6 {
        store.add_node(NodeKind::Generic, Point::new(f64::from(i), 0.0), None);
    }
    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(store.nodes().len(), 3);
}

// ─── Selection and history ──────────────────────────────────────────────

#[test]
fn surface_selection_is_not_an_undo_step() {
    init_logger();
    let mut store = CanvasStore::new();
    let a = store.add_node(NodeKind::Generic, Point::ORIGIN, None);
    store.apply_node_changes(vec![NodeChange::Select {
        id: a.id,
        selected: true,
    }]);
    assert!(store.node(a.id).unwrap().selected);

    // The only undo step is the add; the click is not recorded.
    assert!(store.undo());
    assert!(store.nodes().is_empty());
    assert!(!store.can_undo());
}

#[test]
fn edge_click_is_not_an_undo_step() {
    let mut store = loaded_store();
    store.apply_edge_changes(vec![EdgeChange::Select {
        id: id("edge_readme_logo"),
        selected: true,
    }]);
    assert!(!store.can_undo());
}

#[test]
fn undo_keeps_the_current_selection() {
    init_logger();
    let mut store = CanvasStore::new();
    let a = store.add_node(NodeKind::Generic, Point::ORIGIN, None);
    let b = store.add_node(NodeKind::Generic, Point::new(300.0, 0.0), None);
    let edge = store.connect(a.id, b.id);

    store.select(Some(a.id));
    store.update_node_data(
        b.id,
        NodeDataPatch {
            label: Some("edited".into()),
            ..Default::default()
        },
    );
    store.select_edge(Some(edge.id));

    assert!(store.undo());
    assert_eq!(store.node(b.id).unwrap().data.label, "New Task");
    assert_eq!(store.selected_edge(), Some(edge.id));
    assert_eq!(store.selected_node(), None);
    assert!(store.edges()[0].selected);
    assert!(store.nodes().iter().all(|n| !n.selected));

    assert!(store.redo());
    assert_eq!(store.node(b.id).unwrap().data.label, "edited");
    assert_eq!(store.selected_edge(), Some(edge.id));
    assert!(store.nodes().iter().all(|n| !n.selected));
}

#[test]
fn paste_takes_over_an_edge_selection() {
    init_logger();
    let mut store = CanvasStore::new();
    let a = store.add_node(NodeKind::Generic, Point::ORIGIN, None);
    let b = store.add_node(NodeKind::Generic, Point::new(300.0, 0.0), None);
    let edge = store.connect(a.id, b.id);

    store.select(Some(a.id));
    assert_eq!(store.copy_selection(), 1);
    store.select_edge(Some(edge.id));

    let pasted = store.paste();
    assert_eq!(pasted.len(), 1);
    assert!(store.node(pasted[0].id).unwrap().selected);
    assert!(!store.edges()[0].selected);
    assert_eq!(store.selected_edge(), None);
    assert_eq!(store.selected_node(), None);
}

// ─── Removal ────────────────────────────────────────────────────────────

#[test]
fn removing_a_group_leaves_children_and_edges() {
    let mut store = loaded_store();
    store.apply_node_changes(vec![NodeChange::Remove {
        id: id("group_phase1"),
    }]);

    assert!(store.node(id("group_phase1")).is_none());
    assert_eq!(store.nodes().len(), 5);
    assert_eq!(store.edges().len(), 2);
    // The orphaned child keeps its dangling parent and renders at its offset.
    let setup = store.node(id("task_setup")).unwrap();
    assert_eq!(setup.parent_id(), Some(id("group_phase1")));
    assert_eq!(
        absolute_position(store.nodes(), id("task_setup")),
        Some(Point::new(30.0, 60.0))
    );
    assert!(store.lint().iter().any(|d| d.rule == "dangling-parent"));

    store.apply_edge_changes(vec![EdgeChange::Remove {
        id: id("edge_setup_deep"),
    }]);
    assert_eq!(store.edges().len(), 1);
}

// ─── Reparent ───────────────────────────────────────────────────────────

#[test]
fn reparent_cycle_leaves_store_untouched() {
    let mut store = loaded_store();
    let before = store.scene().clone();
    let err = store
        .reparent(id("group_phase1"), Some(id("group_inner")))
        .unwrap_err();
    assert!(matches!(err, StoreError::Cycle(_)));
    assert_eq!(store.scene(), &before);
    assert!(!store.can_undo());
}

#[test]
fn reparent_is_undoable() {
    let mut store = loaded_store();
    let before = store.scene().clone();
    store.reparent(id("task_deep"), None).unwrap();
    assert_eq!(store.node(id("task_deep")).unwrap().parent_id(), None);
    assert_eq!(
        absolute_position(store.nodes(), id("task_deep")),
        Some(Point::new(130.0, 150.0))
    );
    store.undo();
    assert_eq!(store.scene(), &before);
}

// ─── Clipboard ──────────────────────────────────────────────────────────

#[test]
fn paste_duplicates_selection_with_fresh_ids() {
    let mut store = loaded_store();
    store.apply_node_changes(vec![
        NodeChange::Select {
            id: id("note_readme"),
            selected: true,
        },
        NodeChange::Select {
            id: id("task_setup"),
            selected: true,
        },
    ]);
    assert_eq!(store.copy_selection(), 2);

    let pasted = store.paste();
    assert_eq!(pasted.len(), 2);
    assert_eq!(store.nodes().len(), 8);
    assert_eq!(store.edges().len(), 2);
    assert_ne!(pasted[0].id, pasted[1].id);

    for copy in &pasted {
        assert!(copy.selected);
        assert!(!["note_readme", "task_setup"].contains(&copy.id.as_str()));
    }
    let readme_copy = pasted.iter().find(|n| n.data.label == "Readme").unwrap();
    assert_eq!(readme_copy.placement.raw(), Point::new(650.5, 100.25));
    let setup_copy = pasted.iter().find(|n| n.data.label == "Set up repo").unwrap();
    assert_eq!(setup_copy.parent_id(), Some(id("group_phase1")));

    let originals_selected = store
        .nodes()
        .iter()
        .filter(|n| n.selected)
        .map(|n| n.id)
        .collect::<Vec<_>>();
    assert_eq!(originals_selected, pasted.iter().map(|n| n.id).collect::<Vec<_>>());

    // Pasting again produces yet another set of ids.
    let second = store.paste();
    assert!(second.iter().all(|n| pasted.iter().all(|p| p.id != n.id)));
}

// ─── Layout ─────────────────────────────────────────────────────────────

/// Stacks nodes along the flow direction, 150 units apart.
struct StackLayout;

impl LayoutEngine for StackLayout {
    fn layout(&self, nodes: &[Node], _edges: &[Edge], direction: LayoutDirection) -> Vec<Node> {
        nodes
            .iter()
            .rev()
            .enumerate()
            .map(|(i, node)| {
                let mut node = node.clone();
                let step = 150.0 * i as f64;
                let point = match direction {
                    LayoutDirection::TopBottom => Point::new(0.0, step),
                    LayoutDirection::LeftRight => Point::new(step, 0.0),
                };
                node.placement = Placement::from_parts(point, node.parent_id());
                node.handles = Some(direction.handle_sides());
                node
            })
            .collect()
    }
}

#[test]
fn layout_results_are_reordered_and_undoable() {
    let mut store = loaded_store();
    let before = store.scene().clone();

    store.apply_layout(&StackLayout, LayoutDirection::LeftRight);

    let at = |name: &str| store.nodes().iter().position(|n| n.id == id(name)).unwrap();
    assert!(at("group_phase1") < at("task_setup"));
    assert!(at("group_inner") < at("task_deep"));
    assert!(store.nodes().iter().all(|n| n.handles
        == Some(HandleSides {
            source: Side::Right,
            target: Side::Left
        })));

    store.undo();
    assert_eq!(store.scene(), &before);
}
