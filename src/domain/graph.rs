// Feature graph structures for loopnest_graph.
// A tree of loop scopes and memory operations rooted at one synthetic node.

use serde::{Deserialize, Serialize};

/// Label of the synthetic tree root.
pub const ROOT_LABEL: &str = "root";
/// Label of a loop-scope node.
pub const LOOP_LABEL: &str = "for";

/// Kind of a parent-to-child edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Nesting or reference established while building the tree.
    Structural,
}

impl EdgeKind {
    /// Integer tag written to the edge-kind section.
    pub fn tag(self) -> i32 {
        match self {
            EdgeKind::Structural => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EdgeKind::Structural => "structural",
        }
    }
}

/// A node in the feature graph. Children are owned and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub label: String,
    pub children: Vec<(GraphNode, EdgeKind)>,
}

impl GraphNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_LABEL)
    }

    pub fn push_child(&mut self, child: GraphNode, kind: EdgeKind) {
        self.children.push((child, kind));
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter().map(|(child, _)| child));
        }
        count
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Child at `index`, if any.
    pub fn child(&self, index: usize) -> Option<&GraphNode> {
        self.children.get(index).map(|(child, _)| child)
    }
}

// Deep loop nests would overflow the call stack with the derived
// recursive drop.
impl Drop for GraphNode {
    fn drop(&mut self) {
        let mut pending: Vec<GraphNode> =
            self.children.drain(..).map(|(child, _)| child).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.drain(..).map(|(child, _)| child));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_counts_subtree() {
        let mut root = GraphNode::root();
        let mut l = GraphNode::new(LOOP_LABEL);
        l.push_child(GraphNode::new("i"), EdgeKind::Structural);
        root.push_child(l, EdgeKind::Structural);
        assert_eq!(root.subtree_size(), 3);
        assert!(!root.is_leaf());
        assert_eq!(root.child(0).map(|n| n.label.as_str()), Some("for"));
    }

    #[test]
    fn test_deep_chain_counts_and_drops() {
        let mut node = GraphNode::new("i");
        for _ in 0..200_000 {
            let mut parent = GraphNode::new(LOOP_LABEL);
            parent.push_child(node, EdgeKind::Structural);
            node = parent;
        }
        assert_eq!(node.subtree_size(), 200_001);
        drop(node);
    }

    #[test]
    fn test_structural_tag_is_zero() {
        assert_eq!(EdgeKind::Structural.tag(), 0);
    }
}
