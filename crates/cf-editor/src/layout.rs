//! Automatic layout collaborator.
//!
//! The engine does not place nodes itself. A host plugs in a layered
//! layout implementation through [`LayoutEngine`]; the store takes its
//! output verbatim (re-ordered parent-first) as the new node collection.

use cf_core::model::{Edge, HandleSides, Node, Side};

/// Flow direction for layered layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    /// Ranks run top to bottom.
    #[default]
    TopBottom,
    /// Ranks run left to right.
    LeftRight,
}

impl LayoutDirection {
    /// Connection sides a layout in this direction should prefer.
    pub fn handle_sides(self) -> HandleSides {
        match self {
            LayoutDirection::TopBottom => HandleSides {
                source: Side::Bottom,
                target: Side::Top,
            },
            LayoutDirection::LeftRight => HandleSides {
                source: Side::Right,
                target: Side::Left,
            },
        }
    }
}

/// Computes suggested positions for a node collection.
///
/// Implementations return every input node with an updated placement and,
/// typically, `handles` set from [`LayoutDirection::handle_sides`].
pub trait LayoutEngine {
    fn layout(&self, nodes: &[Node], edges: &[Edge], direction: LayoutDirection) -> Vec<Node>;
}
