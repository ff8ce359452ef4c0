//! Post-order serialization of the feature graph into flat tables.

use crate::domain::graph::{EdgeKind, GraphNode};

/// Parallel per-node tables, row `i` describing node id `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTables {
    pub root_id: usize,
    pub children: Vec<Vec<usize>>,
    pub edge_kinds: Vec<Vec<EdgeKind>>,
    pub labels: Vec<String>,
}

impl FlatTables {
    /// Assign post-order ids to every node reachable from `root` and
    /// linearize the tree. Children get their ids before their parent, so
    /// the root ends up with the largest id.
    pub fn from_tree(root: &GraphNode) -> Self {
        let capacity = root.subtree_size();
        let mut tables = FlatTables {
            root_id: 0,
            children: Vec::with_capacity(capacity),
            edge_kinds: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
        };
        tables.root_id = tables.visit(root);
        tables
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Post-order walk with an explicit stack: each entry holds a node, the
    /// index of its next unvisited child and the ids its children received.
    fn visit(&mut self, root: &GraphNode) -> usize {
        let mut open: Vec<(&GraphNode, usize, Vec<usize>)> = vec![(root, 0, Vec::new())];
        let mut root_id = 0;

        while let Some(top) = open.last_mut() {
            let node: &GraphNode = top.0;
            if let Some((child, _)) = node.children.get(top.1) {
                top.1 += 1;
                open.push((child, 0, Vec::with_capacity(child.children.len())));
                continue;
            }
            let Some((node, _, child_ids)) = open.pop() else {
                break;
            };
            let id = self.labels.len();
            self.children.push(child_ids);
            self.edge_kinds.push(node.children.iter().map(|(_, kind)| *kind).collect());
            self.labels.push(node.label.clone());
            match open.last_mut() {
                Some(parent) => parent.2.push(id),
                None => root_id = id,
            }
        }
        root_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str) -> GraphNode {
        GraphNode::new(label)
    }

    #[test]
    fn test_root_only() {
        let tables = FlatTables::from_tree(&GraphNode::root());
        assert_eq!(tables.node_count(), 1);
        assert_eq!(tables.root_id, 0);
        assert_eq!(tables.children, vec![Vec::<usize>::new()]);
        assert_eq!(tables.labels, vec!["root"]);
    }

    #[test]
    fn test_post_order_ids() {
        // root -> for(i, A(i))
        let mut a = leaf("A");
        a.push_child(leaf("i"), EdgeKind::Structural);
        let mut l = leaf("for");
        l.push_child(leaf("i"), EdgeKind::Structural);
        l.push_child(a, EdgeKind::Structural);
        let mut root = GraphNode::root();
        root.push_child(l, EdgeKind::Structural);

        let tables = FlatTables::from_tree(&root);
        assert_eq!(tables.labels, vec!["i", "i", "A", "for", "root"]);
        assert_eq!(tables.root_id, 4);
        assert_eq!(tables.children[2], vec![1]);
        assert_eq!(tables.children[3], vec![0, 2]);
        assert_eq!(tables.children[4], vec![3]);
        for (ids, kinds) in tables.children.iter().zip(&tables.edge_kinds) {
            assert_eq!(ids.len(), kinds.len());
        }
    }

    #[test]
    fn test_deep_chain_keeps_post_order() {
        const DEPTH: usize = 150_000;
        let mut node = leaf("A");
        for _ in 0..DEPTH {
            let mut parent = leaf("for");
            parent.push_child(leaf("i"), EdgeKind::Structural);
            parent.push_child(node, EdgeKind::Structural);
            node = parent;
        }

        let tables = FlatTables::from_tree(&node);
        assert_eq!(tables.node_count(), 2 * DEPTH + 1);
        assert_eq!(tables.root_id, 2 * DEPTH);
        // every level's "i" is numbered on the way down, then "A" and the
        // loops close from the innermost out
        assert_eq!(tables.labels[0], "i");
        assert_eq!(tables.labels[DEPTH - 1], "i");
        assert_eq!(tables.labels[DEPTH], "A");
        assert_eq!(tables.labels[DEPTH + 1], "for");
        assert_eq!(tables.children[DEPTH + 1], vec![DEPTH - 1, DEPTH]);
        assert_eq!(tables.children[tables.root_id], vec![0, 2 * DEPTH - 1]);
    }
}
