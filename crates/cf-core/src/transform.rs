//! Coordinate transforms between local and absolute canvas space.
//!
//! Everything here is pure arithmetic over [`Placement`]s. A node's raw
//! point is local to its parent when it has one, so any consumer that
//! needs canvas coordinates goes through [`absolute_position`].

use crate::hierarchy::ancestor_chain;
use crate::id::NodeId;
use crate::model::{Node, Point, Size, index_nodes};

/// Footprint assumed for nodes without an explicit size.
pub const DEFAULT_FOOTPRINT: Size = Size::new(200.0, 100.0);

/// Sum `node`'s raw point and each ancestor's, nearest first, stopping
/// after the first ancestor that has no parent.
pub fn to_absolute(node: &Node, ancestors: &[&Node]) -> Point {
    let mut acc = node.placement.raw();
    for ancestor in ancestors {
        acc = acc + ancestor.placement.raw();
        if ancestor.parent_id().is_none() {
            break;
        }
    }
    acc
}

/// Absolute canvas position of node `id`. A dangling parent ends the walk,
/// so the remaining offset is read as if anchored at the canvas origin.
pub fn absolute_position(nodes: &[Node], id: NodeId) -> Option<Point> {
    let index = index_nodes(nodes);
    let node = index.get(&id)?;
    let chain = ancestor_chain(&index, id);
    Some(to_absolute(node, &chain))
}

/// Core reparent arithmetic on explicit parent origins.
///
/// - detach: `p + old`
/// - attach: `p - new`
/// - across groups: `p + old - new`
/// - neither: `p`
pub fn reparent_offset(position: Point, old_origin: Option<Point>, new_origin: Option<Point>) -> Point {
    match (old_origin, new_origin) {
        (Some(old), None) => position + old,
        (None, Some(new)) => position - new,
        (Some(old), Some(new)) => position + old - new,
        (None, None) => position,
    }
}

/// New raw position for `node` when it moves from `old_parent` to
/// `new_parent`, using the parents' own raw positions as origins.
///
/// Reparenting to the same parent leaves the position unchanged.
pub fn reparent_position(node: &Node, old_parent: Option<&Node>, new_parent: Option<&Node>) -> Point {
    let position = node.placement.raw();
    match (old_parent, new_parent) {
        (Some(old), Some(new)) if old.id == new.id => position,
        _ => reparent_offset(
            position,
            old_parent.map(|p| p.placement.raw()),
            new_parent.map(|p| p.placement.raw()),
        ),
    }
}

/// Absolute centre of a node, for centring the camera on it.
pub fn focus_point(nodes: &[Node], id: NodeId) -> Option<Point> {
    let origin = absolute_position(nodes, id)?;
    let size = nodes
        .iter()
        .find(|n| n.id == id)
        .and_then(|n| n.size)
        .unwrap_or(DEFAULT_FOOTPRINT);
    Some(Point::new(
        origin.x + size.width / 2.0,
        origin.y + size.height / 2.0,
    ))
}
