//! Copy/paste of node subsets.
//!
//! The clipboard holds its own deep copy, so later edits to the canvas do
//! not leak into what gets pasted. Edges are never copied.

use cf_core::id::NodeId;
use cf_core::model::{Node, Point};

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    nodes: Vec<Node>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every node flagged `selected`. With nothing selected the
    /// previous clipboard contents are kept. Returns how many were copied.
    pub fn copy(&mut self, nodes: &[Node]) -> usize {
        let selected: Vec<Node> = nodes.iter().filter(|n| n.selected).cloned().collect();
        if selected.is_empty() {
            return 0;
        }
        log::debug!("copied {} node(s)", selected.len());
        self.nodes = selected;
        self.nodes.len()
    }

    /// Build paste-ready copies: fresh ids, shifted by `offset`, selected.
    ///
    /// Parent ids, kinds and payloads are kept verbatim, even when the
    /// parent itself was not copied.
    pub fn paste(&self, offset: Point, mut fresh_id: impl FnMut() -> NodeId) -> Vec<Node> {
        self.nodes
            .iter()
            .map(|original| {
                let mut node = original.clone();
                node.id = fresh_id();
                node.placement.translate(offset.x, offset.y);
                node.selected = true;
                node
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::model::{NodeData, NodeKind};
    use pretty_assertions::assert_eq;

    fn card(name: &str, selected: bool) -> Node {
        let mut n = Node::new(NodeId::intern(name), NodeKind::Generic, Point::new(10.0, 20.0))
            .with_data(NodeData::labeled(name));
        n.selected = selected;
        n
    }

    #[test]
    fn copy_takes_only_selected() {
        let mut clip = Clipboard::new();
        let copied = clip.copy(&[card("c_a", true), card("c_b", false), card("c_c", true)]);
        assert_eq!(copied, 2);
        assert_eq!(clip.len(), 2);
    }

    #[test]
    fn copy_with_nothing_selected_keeps_contents() {
        let mut clip = Clipboard::new();
        clip.copy(&[card("c_keep", true)]);
        assert_eq!(clip.copy(&[card("c_none", false)]), 0);
        assert_eq!(clip.len(), 1);
    }

    #[test]
    fn paste_regenerates_ids_and_offsets() {
        let group = NodeId::intern("c_group");
        let mut child = card("c_child", true).inside(group, Point::new(1.0, 2.0));
        child.selected = true;

        let mut clip = Clipboard::new();
        clip.copy(&[child.clone()]);

        let mut n = 0;
        let pasted = clip.paste(Point::new(50.0, 50.0), || {
            n += 1;
            NodeId::intern(&format!("c_fresh_{n}"))
        });

        assert_eq!(pasted.len(), 1);
        let copy = &pasted[0];
        assert_eq!(copy.id.as_str(), "c_fresh_1");
        assert_eq!(copy.parent_id(), Some(group));
        assert_eq!(copy.placement.raw(), Point::new(51.0, 52.0));
        assert_eq!(copy.data, child.data);
        assert!(copy.selected);
    }

    #[test]
    fn clipboard_is_independent_of_source() {
        let mut source = vec![card("c_src", true)];
        let mut clip = Clipboard::new();
        clip.copy(&source);
        source[0].data.label = "edited later".into();

        let pasted = clip.paste(Point::ORIGIN, || NodeId::intern("c_indep"));
        assert_eq!(pasted[0].data.label, "c_src");
    }

    #[test]
    fn empty_clipboard_pastes_nothing() {
        let clip = Clipboard::new();
        assert!(clip.is_empty());
        assert!(clip.paste(Point::ORIGIN, || NodeId::intern("c_never")).is_empty());
    }
}
