//! Canvas reducer: `(state, action) -> state`.
//!
//! Every store mutation is an [`Action`] folded by [`reduce`]. The reducer
//! is pure: it never generates ids or reads the clock, so the store builds
//! fresh records before dispatching. Returning a new state (instead of
//! mutating in place) is what lets history keep immutable snapshots.

use cf_core::hierarchy::{self, CycleError};
use cf_core::id::NodeId;
use cf_core::model::*;
use cf_core::ordering::order_parent_first;
use std::collections::HashSet;
use thiserror::Error;

/// Full editor state: the tracked scene plus primary selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasState {
    /// Nodes and edges (tracked by history).
    pub scene: Scene,
    /// Node opened in the side panel, if any.
    pub selected_node: Option<NodeId>,
    /// Edge opened in the side panel, if any.
    pub selected_edge: Option<NodeId>,
}

impl CanvasState {
    pub fn from_scene(scene: Scene) -> Self {
        Self {
            scene,
            ..Default::default()
        }
    }

    /// Swap in a scene from history while keeping the live selection.
    ///
    /// Selection flags are taken from the current scene, not the incoming
    /// one: surviving ids keep their flag, restored ids come back
    /// unselected, and primary ids that no longer resolve are dropped.
    pub fn restore_scene(&mut self, scene: Scene) {
        let nodes: HashSet<NodeId> = self.scene.selected_nodes().map(|n| n.id).collect();
        let edges: HashSet<NodeId> = self
            .scene
            .edges
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id)
            .collect();

        self.scene = scene;
        for node in &mut self.scene.nodes {
            node.selected = nodes.contains(&node.id);
        }
        for edge in &mut self.scene.edges {
            edge.selected = edges.contains(&edge.id);
        }
        self.reconcile_selection();
    }

    /// Drop primary selections that no longer point at anything
    /// (after undo/redo swaps the scene underneath them).
    pub fn reconcile_selection(&mut self) {
        if let Some(id) = self.selected_node
            && self.scene.node(id).is_none()
        {
            self.selected_node = None;
        }
        if let Some(id) = self.selected_edge
            && self.scene.edge(id).is_none()
        {
            self.selected_edge = None;
        }
    }
}

/// An incremental node change reported by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// Drag by a delta, in the node's own coordinate space.
    Move { id: NodeId, dx: f64, dy: f64 },
    Select { id: NodeId, selected: bool },
    Resize { id: NodeId, size: Size },
    /// Remove the node only. Children and incident edges are left alone.
    Remove { id: NodeId },
}

impl NodeChange {
    pub fn id(&self) -> NodeId {
        match self {
            NodeChange::Move { id, .. }
            | NodeChange::Select { id, .. }
            | NodeChange::Resize { id, .. }
            | NodeChange::Remove { id } => *id,
        }
    }
}

/// An incremental edge change reported by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeChange {
    Select { id: NodeId, selected: bool },
    Remove { id: NodeId },
}

/// A mutation of the canvas state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    NodeChanges(Vec<NodeChange>),
    EdgeChanges(Vec<EdgeChange>),
    /// Append a fully built edge (fresh id assigned by the store).
    Connect(Edge),
    /// Append a fully built node (fresh id assigned by the store).
    AddNode(Node),
    UpdateNodeData { id: NodeId, patch: NodeDataPatch },
    UpdateEdge { id: NodeId, patch: EdgePatch },
    Reparent { id: NodeId, parent: Option<NodeId> },
    SelectNode(Option<NodeId>),
    SelectEdge(Option<NodeId>),
    /// Replace the node collection wholesale (layout results).
    ReplaceNodes(Vec<Node>),
    /// Deselect every node and edge, then append the pasted nodes.
    Paste(Vec<Node>),
}

impl Action {
    /// Whether this action can change the tracked `(nodes, edges)`.
    /// Click-driven selection is transient and never enters history; select
    /// changes inside a change batch are filtered out by content comparison.
    pub fn is_tracked(&self) -> bool {
        !matches!(self, Action::SelectNode(_) | Action::SelectEdge(_))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Action::NodeChanges(_) => "node changes",
            Action::EdgeChanges(_) => "edge changes",
            Action::Connect(_) => "connect",
            Action::AddNode(_) => "add node",
            Action::UpdateNodeData { .. } => "edit node",
            Action::UpdateEdge { .. } => "edit edge",
            Action::Reparent { .. } => "change group",
            Action::SelectNode(_) => "select node",
            Action::SelectEdge(_) => "select edge",
            Action::ReplaceNodes(_) => "layout",
            Action::Paste(_) => "paste",
        }
    }
}

/// A rejected action. The state it was applied to is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Fold `action` into `state`, returning the next state.
///
/// # Errors
/// [`StoreError::Cycle`] when a reparent would nest a node inside itself.
pub fn reduce(state: &CanvasState, action: Action) -> Result<CanvasState, StoreError> {
    let mut next = state.clone();
    log::debug!("reduce: {}", action.describe());

    match action {
        Action::NodeChanges(changes) => apply_node_changes(&mut next, changes),
        Action::EdgeChanges(changes) => apply_edge_changes(&mut next, changes),
        Action::Connect(edge) => next.scene.edges.push(edge),
        Action::AddNode(node) => next.scene.nodes.push(node),
        Action::UpdateNodeData { id, patch } => {
            if let Some(node) = next.scene.node_mut(id) {
                node.data.merge(&patch);
            }
        }
        Action::UpdateEdge { id, patch } => {
            if let Some(edge) = next.scene.edge_mut(id) {
                edge.merge(&patch);
            }
        }
        Action::Reparent { id, parent } => {
            next.scene.nodes = hierarchy::reparent(&state.scene.nodes, id, parent)?;
        }
        Action::SelectNode(id) => select_node(&mut next, id),
        Action::SelectEdge(id) => select_edge(&mut next, id),
        Action::ReplaceNodes(nodes) => {
            next.scene.nodes = order_parent_first(nodes).nodes;
        }
        Action::Paste(pasted) => {
            clear_node_selection(&mut next);
            clear_edge_selection(&mut next);
            next.scene.nodes.extend(pasted);
        }
    }

    Ok(next)
}

fn apply_node_changes(state: &mut CanvasState, changes: Vec<NodeChange>) {
    for change in changes {
        log::trace!("node change {change:?}");
        match change {
            NodeChange::Move { id, dx, dy } => {
                if let Some(node) = state.scene.node_mut(id) {
                    node.placement.translate(dx, dy);
                }
            }
            NodeChange::Select { id, selected } => {
                if let Some(node) = state.scene.node_mut(id) {
                    node.selected = selected;
                }
                if selected {
                    clear_edge_selection(state);
                }
            }
            NodeChange::Resize { id, size } => {
                if let Some(node) = state.scene.node_mut(id) {
                    node.size = Some(size);
                }
            }
            NodeChange::Remove { id } => {
                state.scene.nodes.retain(|n| n.id != id);
                if state.selected_node == Some(id) {
                    state.selected_node = None;
                }
            }
        }
    }
}

fn apply_edge_changes(state: &mut CanvasState, changes: Vec<EdgeChange>) {
    for change in changes {
        log::trace!("edge change {change:?}");
        match change {
            EdgeChange::Select { id, selected } => {
                if let Some(edge) = state.scene.edge_mut(id) {
                    edge.selected = selected;
                }
                if selected {
                    clear_node_selection(state);
                }
            }
            EdgeChange::Remove { id } => {
                state.scene.edges.retain(|e| e.id != id);
                if state.selected_edge == Some(id) {
                    state.selected_edge = None;
                }
            }
        }
    }
}

fn clear_node_selection(state: &mut CanvasState) {
    state.selected_node = None;
    for node in &mut state.scene.nodes {
        node.selected = false;
    }
}

fn clear_edge_selection(state: &mut CanvasState) {
    state.selected_edge = None;
    for edge in &mut state.scene.edges {
        edge.selected = false;
    }
}

/// Make `id` the only selected node; `None` clears node selection.
fn select_node(state: &mut CanvasState, id: Option<NodeId>) {
    let id = id.filter(|id| state.scene.node(*id).is_some());
    clear_edge_selection(state);
    state.selected_node = id;
    for node in &mut state.scene.nodes {
        node.selected = Some(node.id) == id;
    }
}

/// Make `id` the only selected edge; `None` clears edge selection.
fn select_edge(state: &mut CanvasState, id: Option<NodeId>) {
    let id = id.filter(|id| state.scene.edge(*id).is_some());
    clear_node_selection(state);
    state.selected_edge = id;
    for edge in &mut state.scene.edges {
        edge.selected = Some(edge.id) == id;
    }
}
