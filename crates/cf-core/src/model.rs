//! Core data model for CF canvases.
//!
//! A canvas is a flat collection of nodes plus directed edges between node
//! ids. Grouping is expressed through a parent pointer on each node, which
//! makes the collection a forest (an arena keyed by `NodeId`, never an
//! ownership tree). A node's position is only meaningful together with its
//! parent, so it is stored as a [`Placement`] rather than a bare point.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{Add, Sub};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point or offset on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Explicit node dimensions (set by resize gestures or defaults).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ─── Placement ───────────────────────────────────────────────────────────

/// Where a node sits, tagged with the coordinate space of its point.
///
/// Read absolute positions through `transform::absolute_position`; the raw
/// point is only meaningful in the space named here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Canvas space. The node has no parent.
    Absolute(Point),
    /// Relative to the origin of `parent`.
    Local { parent: NodeId, offset: Point },
}

impl Placement {
    /// Build a placement from a raw point and an optional parent.
    pub fn from_parts(point: Point, parent: Option<NodeId>) -> Self {
        match parent {
            Some(parent) => Placement::Local {
                parent,
                offset: point,
            },
            None => Placement::Absolute(point),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Placement::Absolute(_) => None,
            Placement::Local { parent, .. } => Some(*parent),
        }
    }

    /// The stored point, in whichever space this placement names.
    pub fn raw(&self) -> Point {
        match self {
            Placement::Absolute(p) => *p,
            Placement::Local { offset, .. } => *offset,
        }
    }

    /// Shift the stored point without changing its space.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let delta = Point::new(dx, dy);
        match self {
            Placement::Absolute(p) => *p = *p + delta,
            Placement::Local { offset, .. } => *offset = *offset + delta,
        }
    }
}

// ─── Node payload ────────────────────────────────────────────────────────

/// The node kinds a canvas can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Task card with label, status and description.
    Generic,
    /// Image reference (`data.link` points at a local file).
    Image,
    /// Markdown note rendered from `data.description`.
    Markdown,
    /// Group container. Children reference it through their placement.
    Group,
}

/// Task progress shown on generic nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

/// User-editable payload carried by every node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl NodeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Default payload for a freshly created node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Generic => Self {
                label: "New Task".into(),
                status: Some(Status::Todo),
                ..Default::default()
            },
            NodeKind::Image => Self::labeled("Image"),
            NodeKind::Markdown => Self {
                label: "Note".into(),
                description: Some(
                    "# New Note\nSelect this node and edit the **description** in the side panel."
                        .into(),
                ),
                ..Default::default()
            },
            NodeKind::Group => Self::labeled("Group"),
        }
    }

    /// Shallow-merge a patch: only fields present in the patch change.
    pub fn merge(&mut self, patch: &NodeDataPatch) {
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(link) = &patch.link {
            self.link = link.clone();
        }
    }
}

/// Partial update for [`NodeData`]. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub status: Option<Option<Status>>,
    pub description: Option<Option<String>>,
    pub link: Option<Option<String>>,
}

/// Side of a node where a connection attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Preferred connection sides, written by the layout collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleSides {
    pub source: Side,
    pub target: Side,
}

/// Marker on a node that is clipped to its parent's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Extent {
    Parent,
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A placed entity on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub placement: Placement,
    pub data: NodeData,
    pub size: Option<Size>,
    pub selected: bool,
    pub z_index: Option<i32>,
    pub handles: Option<HandleSides>,
}

impl Node {
    /// A root-level node at an absolute position with empty payload.
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        Self {
            id,
            kind,
            placement: Placement::Absolute(position),
            data: NodeData::default(),
            size: None,
            selected: false,
            z_index: None,
            handles: None,
        }
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    /// Same node, placed locally inside `parent` at `offset`.
    pub fn inside(mut self, parent: NodeId, offset: Point) -> Self {
        self.placement = Placement::Local { parent, offset };
        self
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.placement.parent()
    }

    /// Whether the node is clipped to its parent's bounds. Derived from
    /// the placement: every parented node is contained.
    pub fn is_contained(&self) -> bool {
        self.parent_id().is_some()
    }

    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    /// Field-wise equality, skipping `selected`.
    pub fn same_content(&self, other: &Node) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.placement == other.placement
            && self.data == other.data
            && self.size == other.size
            && self.z_index == other.z_index
            && self.handles == other.handles
    }
}

/// Wire shape of a node: a flat `position` plus an optional `parentId`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    id: NodeId,
    kind: NodeKind,
    position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extent: Option<Extent>,
    data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
    #[serde(default)]
    selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handles: Option<HandleSides>,
}

impl From<NodeRecord> for Node {
    fn from(r: NodeRecord) -> Self {
        Self {
            id: r.id,
            kind: r.kind,
            placement: Placement::from_parts(r.position, r.parent_id),
            data: r.data,
            size: r.size,
            selected: r.selected,
            z_index: r.z_index,
            handles: r.handles,
        }
    }
}

impl From<Node> for NodeRecord {
    fn from(n: Node) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            position: n.placement.raw(),
            parent_id: n.placement.parent(),
            extent: n.is_contained().then_some(Extent::Parent),
            data: n.data,
            size: n.size,
            selected: n.selected,
            z_index: n.z_index,
            handles: n.handles,
        }
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// Arrow head drawn at the target end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndMarker {
    None,
    Arrow,
}

/// A directed connection between two node ids. Endpoints may dangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: NodeId,
    #[serde(rename = "sourceNodeId")]
    pub source: NodeId,
    #[serde(rename = "targetNodeId")]
    pub target: NodeId,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_marker: Option<EndMarker>,
}

impl Edge {
    pub fn new(id: NodeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            selected: false,
            end_marker: None,
        }
    }

    pub fn merge(&mut self, patch: &EdgePatch) {
        if let Some(marker) = patch.end_marker {
            self.end_marker = marker;
        }
        if let Some(selected) = patch.selected {
            self.selected = selected;
        }
    }

    /// Field-wise equality, skipping `selected`.
    pub fn same_content(&self, other: &Edge) -> bool {
        self.id == other.id
            && self.source == other.source
            && self.target == other.target
            && self.end_marker == other.end_marker
    }
}

/// Partial update for an [`Edge`]. `Some(None)` clears the marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub end_marker: Option<Option<EndMarker>>,
    pub selected: Option<bool>,
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// The `(nodes, edges)` pair: the unit that history snapshots track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Nodes in render order (parents before children).
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Scene {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn edge_mut(&mut self, id: NodeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Whether `id` is used by any node or edge.
    pub fn contains_id(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id) || self.edges.iter().any(|e| e.id == id)
    }

    pub fn selected_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.selected)
    }

    /// Equality that ignores `selected` flags on nodes and edges.
    ///
    /// Selection is transient: two scenes that differ only in what is
    /// selected hold the same document.
    pub fn same_content(&self, other: &Scene) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.edges.len() == other.edges.len()
            && self
                .nodes
                .iter()
                .zip(&other.nodes)
                .all(|(a, b)| a.same_content(b))
            && self
                .edges
                .iter()
                .zip(&other.edges)
                .all(|(a, b)| a.same_content(b))
    }
}

/// Index a node slice by id. The first node wins when ids repeat.
pub fn index_nodes(nodes: &[Node]) -> HashMap<NodeId, &Node> {
    let mut index = HashMap::with_capacity(nodes.len());
    for node in nodes {
        index.entry(node.id).or_insert(node);
    }
    index
}
