//! Parent-first ordering of the node collection.
//!
//! The renderer draws nodes in collection order, so a group must come
//! before its children. Malformed input (dangling or cyclic parents) is
//! tolerated: those nodes are appended at the end and reported, never
//! rejected.

use crate::id::NodeId;
use crate::model::Node;
use std::collections::HashSet;
use std::fmt;

/// Nodes whose parent chain could not be resolved while ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingDegraded {
    /// Ids left unordered, in their original relative order.
    pub unresolved: Vec<NodeId>,
}

impl fmt::Display for OrderingDegraded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} node(s) have a dangling or cyclic parent",
            self.unresolved.len()
        )
    }
}

/// Result of [`order_parent_first`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParentFirst {
    pub nodes: Vec<Node>,
    pub degraded: Option<OrderingDegraded>,
}

/// Reorder `nodes` so every resolvable parent precedes its children.
///
/// Roots keep their input order; children are appended in passes as their
/// parent becomes placed. Idempotent on its own output.
pub fn order_parent_first(nodes: Vec<Node>) -> ParentFirst {
    let mut placed: HashSet<NodeId> = HashSet::with_capacity(nodes.len());
    let mut ordered = Vec::with_capacity(nodes.len());
    let mut pending = Vec::new();

    for node in nodes {
        if node.parent_id().is_none() {
            placed.insert(node.id);
            ordered.push(node);
        } else {
            pending.push(node);
        }
    }

    loop {
        let before = pending.len();
        let mut rest = Vec::with_capacity(before);
        for node in pending {
            match node.parent_id() {
                Some(parent) if placed.contains(&parent) => {
                    placed.insert(node.id);
                    ordered.push(node);
                }
                _ => rest.push(node),
            }
        }
        pending = rest;
        if pending.is_empty() || pending.len() == before {
            break;
        }
    }

    let degraded = if pending.is_empty() {
        None
    } else {
        let unresolved: Vec<NodeId> = pending.iter().map(|n| n.id).collect();
        let report = OrderingDegraded { unresolved };
        log::warn!("parent-first ordering degraded: {report}");
        ordered.extend(pending);
        Some(report)
    };

    ParentFirst {
        nodes: ordered,
        degraded,
    }
}
