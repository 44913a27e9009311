//! The canvas store: single owner of editor state.
//!
//! The store turns UI operations into reducer [`Action`]s, builds fresh
//! records (ids, defaults) the reducer must not invent, and records history
//! around every tracked mutation. Operations are synchronous and atomic:
//! a rejected action leaves state and history exactly as they were.

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::history::History;
use crate::layout::{LayoutDirection, LayoutEngine};
use crate::reducer::{Action, CanvasState, EdgeChange, NodeChange, StoreError, reduce};
use crate::shortcuts::ShortcutAction;
use cf_core::document::{self, ProjectDocument};
use cf_core::id::NodeId;
use cf_core::lint::{LintDiagnostic, lint_scene};
use cf_core::model::*;
use cf_core::ordering::order_parent_first;
use cf_core::transform::focus_point;
use smallvec::SmallVec;

/// What [`CanvasStore::run_shortcut`] did with a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// Handled inside the store.
    Applied,
    /// Nothing to do (empty history, empty clipboard, nothing selected).
    Ignored,
    /// Saving needs the host's file system; the caller runs `io::save`.
    SaveRequested,
}

pub struct CanvasStore {
    state: CanvasState,
    history: History,
    clipboard: Clipboard,
    config: EditorConfig,
    /// Path of the file last opened or saved, for plain "save".
    current_path: Option<String>,
}

impl CanvasStore {
    /// An empty canvas with default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            state: CanvasState::default(),
            history: History::new(config.history_depth),
            clipboard: Clipboard::new(),
            config,
            current_path: None,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    pub fn nodes(&self) -> &[Node] {
        &self.state.scene.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.state.scene.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.state.scene.node(id)
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.state.selected_node
    }

    pub fn selected_edge(&self) -> Option<NodeId> {
        self.state.selected_edge
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn set_current_path(&mut self, path: Option<String>) {
        self.current_path = path;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Structural diagnostics for the current scene.
    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_scene(&self.state.scene)
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Reduce `action` into the current state, recording history when the
    /// scene content changed. Selection-only changes are never recorded.
    ///
    /// # Errors
    /// Propagates reducer rejections; state and history are untouched.
    pub fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        let tracked = action.is_tracked();
        let next = reduce(&self.state, action)?;
        if tracked && !next.scene.same_content(&self.state.scene) {
            self.history.record(&self.state.scene);
        }
        self.state = next;
        Ok(())
    }

    /// Dispatch an action that cannot fail.
    fn apply(&mut self, action: Action) {
        if let Err(err) = self.dispatch(action) {
            log::error!("infallible action rejected: {err}");
        }
    }

    fn fresh_id(&self, prefix: &str) -> NodeId {
        NodeId::fresh(prefix, |id| self.state.scene.contains_id(id))
    }

    // ─── Rendering surface ───────────────────────────────────────────────

    /// Fold a batch of node changes (drag, select, resize, remove).
    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) {
        if changes.is_empty() {
            return;
        }
        self.apply(Action::NodeChanges(changes));
    }

    /// Fold a batch of edge changes (select, remove).
    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) {
        if changes.is_empty() {
            return;
        }
        self.apply(Action::EdgeChanges(changes));
    }

    /// Start a drag gesture: everything until `end_gesture` undoes as one step.
    pub fn begin_gesture(&mut self) {
        self.history.begin_batch(&self.state.scene);
    }

    pub fn end_gesture(&mut self) {
        self.history.end_batch(&self.state.scene);
    }

    /// Connect two nodes. Endpoints are not validated.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Edge {
        let edge = Edge::new(self.fresh_id("edge"), source, target);
        self.apply(Action::Connect(edge.clone()));
        edge
    }

    // ─── Node creation and editing ───────────────────────────────────────

    /// Add a root-level node of `kind`. `data` defaults per kind.
    pub fn add_node(&mut self, kind: NodeKind, position: Point, data: Option<NodeData>) -> Node {
        let mut node = Node::new(self.fresh_id("node"), kind, position)
            .with_data(data.unwrap_or_else(|| NodeData::default_for(kind)));
        match kind {
            NodeKind::Group => {
                node.z_index = Some(self.config.group_z_index);
                node.size = Some(self.config.group_size);
            }
            NodeKind::Image => node.size = Some(self.config.image_size),
            NodeKind::Generic | NodeKind::Markdown => {}
        }
        self.apply(Action::AddNode(node.clone()));
        node
    }

    /// Add an image node referencing `link` (e.g. a dropped file path).
    pub fn add_image_node(&mut self, link: impl Into<String>, position: Point) -> Node {
        let mut data = NodeData::default_for(NodeKind::Image);
        data.link = Some(link.into());
        self.add_node(NodeKind::Image, position, Some(data))
    }

    pub fn update_node_data(&mut self, id: NodeId, patch: NodeDataPatch) {
        self.apply(Action::UpdateNodeData { id, patch });
    }

    pub fn update_edge(&mut self, id: NodeId, patch: EdgePatch) {
        self.apply(Action::UpdateEdge { id, patch });
    }

    /// Move `id` into `parent` (or out to the canvas with `None`).
    ///
    /// # Errors
    /// [`StoreError::Cycle`] if `parent` is `id` or one of its descendants.
    pub fn reparent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), StoreError> {
        self.dispatch(Action::Reparent { id, parent }).inspect_err(|err| {
            log::warn!("reparent rejected: {err}");
        })
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: Option<NodeId>) {
        self.apply(Action::SelectNode(id));
    }

    pub fn select_edge(&mut self, id: Option<NodeId>) {
        self.apply(Action::SelectEdge(id));
    }

    /// First node whose label or description contains `query`
    /// (case-insensitive). Blank queries match nothing.
    pub fn find_node(&self, query: &str) -> Option<NodeId> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.nodes()
            .iter()
            .find(|n| {
                n.data.label.to_lowercase().contains(&needle)
                    || n
                        .data
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .map(|n| n.id)
    }

    /// Select the first match for `query` and return the absolute point the
    /// camera should centre on.
    pub fn search(&mut self, query: &str) -> Option<Point> {
        let id = self.find_node(query)?;
        self.select(Some(id));
        focus_point(self.nodes(), id)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Restore the previous `(nodes, edges)`, keeping the current selection.
    ///
    /// Returns false with nothing to undo, or while a gesture is open.
    pub fn undo(&mut self) -> bool {
        if self.history.is_batching() {
            log::debug!("undo ignored during a gesture");
            return false;
        }
        match self.history.undo(&self.state.scene) {
            Some(snapshot) => {
                self.state.restore_scene((*snapshot).clone());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.history.is_batching() {
            log::debug!("redo ignored during a gesture");
            return false;
        }
        match self.history.redo(&self.state.scene) {
            Some(snapshot) => {
                self.state.restore_scene((*snapshot).clone());
                true
            }
            None => false,
        }
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    /// Copy the selected nodes. Returns how many were copied.
    pub fn copy_selection(&mut self) -> usize {
        self.clipboard.copy(&self.state.scene.nodes)
    }

    /// Paste clipboard nodes with fresh ids; returns the new nodes.
    pub fn paste(&mut self) -> Vec<Node> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let mut taken: SmallVec<[NodeId; 8]> = SmallVec::new();
        let pasted = self.clipboard.paste(self.config.paste_offset, || {
            let id = NodeId::fresh("node", |id| {
                taken.contains(&id) || self.state.scene.contains_id(id)
            });
            taken.push(id);
            id
        });
        self.apply(Action::Paste(pasted.clone()));
        pasted
    }

    // ─── Layout ──────────────────────────────────────────────────────────

    /// Replace node positions with the layout collaborator's suggestion.
    pub fn apply_layout(&mut self, engine: &dyn LayoutEngine, direction: LayoutDirection) {
        let nodes = engine.layout(self.nodes(), self.edges(), direction);
        self.apply(Action::ReplaceNodes(nodes));
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// Snapshot the scene as a saveable document.
    pub fn get_document(&self) -> ProjectDocument {
        document::encode(&self.state.scene)
    }

    /// Replace the canvas with `doc`. Nodes are re-ordered parent-first,
    /// selection is cleared and undo history starts over.
    pub fn load_document(&mut self, doc: ProjectDocument) {
        let scene = doc.into_scene();
        let ordered = order_parent_first(scene.nodes);
        if let Some(degraded) = &ordered.degraded {
            log::warn!("loaded document: {degraded}");
        }
        self.state = CanvasState::from_scene(Scene::new(ordered.nodes, scene.edges));
        self.history.clear();
        log::debug!(
            "loaded document: {} node(s), {} edge(s)",
            self.state.scene.nodes.len(),
            self.state.scene.edges.len()
        );
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Run a resolved keyboard shortcut against the store.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> ShortcutOutcome {
        let applied = match action {
            ShortcutAction::Save => return ShortcutOutcome::SaveRequested,
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Copy => self.copy_selection() > 0,
            ShortcutAction::Paste => !self.paste().is_empty(),
        };
        if applied {
            ShortcutOutcome::Applied
        } else {
            ShortcutOutcome::Ignored
        }
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new()
    }
}
