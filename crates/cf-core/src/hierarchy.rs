//! Parent/child hierarchy: ancestor walks and validated reparenting.
//!
//! Parent pointers are plain lookup keys into the node arena. Loaded data
//! may contain cycles or dangling parents, so every walk here is bounded
//! by a visited set instead of trusting the structure.

use crate::id::NodeId;
use crate::model::{Node, Placement, index_nodes};
use crate::ordering::order_parent_first;
use crate::transform::{reparent_offset, to_absolute};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Reparenting would make a node its own ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move {node} into {parent}: {parent} is inside {node}")]
pub struct CycleError {
    pub node: NodeId,
    pub parent: NodeId,
}

/// Ancestors of `id`, nearest first.
///
/// Stops at a root, at a parent id that does not resolve, or when a node
/// repeats (a cycle in malformed input).
pub fn ancestor_chain<'a>(
    index: &HashMap<NodeId, &'a Node>,
    id: NodeId,
) -> SmallVec<[&'a Node; 4]> {
    let mut chain = SmallVec::new();
    let mut seen = HashSet::from([id]);
    let mut current = index.get(&id).and_then(|n| n.parent_id());

    while let Some(parent_id) = current {
        if !seen.insert(parent_id) {
            break;
        }
        let Some(parent) = index.get(&parent_id) else {
            break;
        };
        chain.push(*parent);
        current = parent.parent_id();
    }
    chain
}

/// Check if `ancestor` is a parent/grandparent/etc. of `descendant`.
pub fn is_ancestor_of(nodes: &[Node], ancestor: NodeId, descendant: NodeId) -> bool {
    if ancestor == descendant {
        return false;
    }
    let index = index_nodes(nodes);
    ancestor_chain(&index, descendant)
        .iter()
        .any(|n| n.id == ancestor)
}

/// Whether putting `node_id` under `new_parent` would close a loop: walk up
/// from the prospective parent and look for the node itself.
fn closes_cycle(index: &HashMap<NodeId, &Node>, node_id: NodeId, new_parent: NodeId) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(new_parent);
    while let Some(id) = current {
        if id == node_id {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        current = index.get(&id).and_then(|n| n.parent_id());
    }
    false
}

/// Move `node_id` under `new_parent` (or to the canvas root when `None`),
/// keeping its absolute position, and return the re-ordered collection.
///
/// Unknown nodes and unresolvable parents leave the collection as it was.
///
/// # Errors
/// [`CycleError`] when `new_parent` is `node_id` itself or one of its
/// descendants. The input is never modified.
pub fn reparent(
    nodes: &[Node],
    node_id: NodeId,
    new_parent: Option<NodeId>,
) -> Result<Vec<Node>, CycleError> {
    let index = index_nodes(nodes);

    if let Some(parent) = new_parent
        && closes_cycle(&index, node_id, parent)
    {
        return Err(CycleError {
            node: node_id,
            parent,
        });
    }

    let Some(node) = index.get(&node_id) else {
        log::warn!("reparent: no node {node_id}");
        return Ok(nodes.to_vec());
    };

    let old_parent = node.parent_id();
    if old_parent == new_parent {
        return Ok(nodes.to_vec());
    }

    // Origins are absolute so that nested groups keep the node in place.
    let origin_of = |id: NodeId| {
        index
            .get(&id)
            .map(|n| to_absolute(n, &ancestor_chain(&index, id)))
    };
    let old_origin = old_parent.and_then(origin_of);
    let new_origin = match new_parent {
        Some(id) => match origin_of(id) {
            Some(origin) => Some(origin),
            None => {
                log::warn!("reparent: target parent {id} does not exist");
                return Ok(nodes.to_vec());
            }
        },
        None => None,
    };

    let position = reparent_offset(node.placement.raw(), old_origin, new_origin);
    log::debug!(
        "reparent {node_id}: {:?} -> {:?}",
        old_parent.map(|p| p.to_string()),
        new_parent.map(|p| p.to_string())
    );

    let moved: Vec<Node> = nodes
        .iter()
        .map(|n| {
            if n.id == node_id {
                let mut n = n.clone();
                n.placement = Placement::from_parts(position, new_parent);
                n
            } else {
                n.clone()
            }
        })
        .collect();

    Ok(order_parent_first(moved).nodes)
}
