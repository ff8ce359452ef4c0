//! Feature Graph Exporter
//!
//! Human-readable renderings of serialized feature graphs. Everything here
//! reads finished tables and never touches the build.

use crate::domain::encoder::BufferLayout;
use crate::domain::serializer::FlatTables;
use std::io::Result;

pub struct GraphExporter;

impl GraphExporter {
    /// Write the DOT rendering to `path`.
    pub fn export_dot(tables: &FlatTables, path: &str) -> Result<()> {
        std::fs::write(path, Self::to_dot(tables))
    }

    /// Header fields, child-id rows, labels and an indented tree view.
    pub fn to_text(tables: &FlatTables, layout: &BufferLayout) -> String {
        let mut lines = Vec::new();

        lines.push(format!("root_id: {}", layout.root_id));
        lines.push(format!("node_count: {}", layout.node_count));
        lines.push(format!("offset_children: {}", layout.offset_children));
        lines.push(format!("offset_edges: {}", layout.offset_edges));
        lines.push(format!("offset_labels: {}", layout.offset_labels));
        lines.push(format!("total_size: {}", layout.total_size));

        lines.push("children:".to_string());
        for (id, row) in tables.children.iter().enumerate() {
            let ids: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            lines.push(format!("  {}: [{}]", id, ids.join(", ")));
        }

        lines.push("labels:".to_string());
        for (id, label) in tables.labels.iter().enumerate() {
            lines.push(format!("  {}: {}", id, label));
        }

        lines.push("tree:".to_string());
        Self::tree_lines(tables, tables.root_id, &mut lines);

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Graphviz rendering, one node per id.
    pub fn to_dot(tables: &FlatTables) -> String {
        let mut lines = Vec::new();

        lines.push("digraph FeatureGraph {".to_string());
        lines.push("    rankdir=TB;".to_string());
        lines.push("    node [fontname=\"Helvetica\", fontsize=12, shape=box];".to_string());
        lines.push("    edge [fontname=\"Helvetica\", fontsize=10];".to_string());
        lines.push("".to_string());

        for (id, label) in tables.labels.iter().enumerate() {
            let shape = if id == tables.root_id {
                "doublecircle"
            } else if label == "for" {
                "hexagon"
            } else if tables.children.get(id).map_or(true, Vec::is_empty) {
                "ellipse"
            } else {
                "box"
            };
            lines.push(format!(
                "    n{} [label=\"{}\", shape={}];",
                id,
                Self::escape_label(label),
                shape
            ));
        }

        lines.push("".to_string());

        for (id, (row, kinds)) in tables.children.iter().zip(&tables.edge_kinds).enumerate() {
            for (child, kind) in row.iter().zip(kinds) {
                lines.push(format!(
                    "    n{} -> n{} [label=\"{}\"];",
                    id,
                    child,
                    kind.name()
                ));
            }
        }

        lines.push("}".to_string());

        lines.join("\n")
    }

    /// Preorder walk from `root`, one space of indent per depth level. Ids
    /// with no row are skipped.
    fn tree_lines(tables: &FlatTables, root: usize, out: &mut Vec<String>) {
        let mut pending = vec![(root, 0usize)];
        while let Some((id, depth)) = pending.pop() {
            let Some(label) = tables.labels.get(id) else {
                continue;
            };
            out.push(format!("{}{}", " ".repeat(depth), label));
            if let Some(row) = tables.children.get(id) {
                pending.extend(row.iter().rev().map(|&child| (child, depth + 1)));
            }
        }
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::EdgeKind;

    fn sample() -> FlatTables {
        // 0: "i", 1: "for" -> [0], 2: "root" -> [1]
        FlatTables {
            root_id: 2,
            children: vec![vec![], vec![0], vec![1]],
            edge_kinds: vec![vec![], vec![EdgeKind::Structural], vec![EdgeKind::Structural]],
            labels: vec!["i".to_string(), "for".to_string(), "root".to_string()],
        }
    }

    #[test]
    fn test_to_text() {
        let tables = sample();
        let layout = BufferLayout::compute(&tables).unwrap();
        let text = GraphExporter::to_text(&tables, &layout);

        assert!(text.starts_with("root_id: 2\nnode_count: 3\noffset_children: 20\n"));
        assert!(text.contains("  1: [0]\n"));
        assert!(text.contains("  2: root\n"));
        assert!(text.ends_with("tree:\nroot\n for\n  i\n"));
    }

    #[test]
    fn test_to_dot() {
        let dot = GraphExporter::to_dot(&sample());
        assert!(dot.contains("digraph FeatureGraph"));
        assert!(dot.contains("n2 [label=\"root\", shape=doublecircle];"));
        assert!(dot.contains("n1 [label=\"for\", shape=hexagon];"));
        assert!(dot.contains("n1 -> n0 [label=\"structural\"];"));
    }

    #[test]
    fn test_dangling_ids_do_not_panic() {
        let tables = FlatTables {
            root_id: 7,
            children: vec![vec![5]],
            edge_kinds: vec![vec![EdgeKind::Structural]],
            labels: vec!["root".to_string(), "A".to_string()],
        };
        let mut lines = Vec::new();
        GraphExporter::tree_lines(&tables, tables.root_id, &mut lines);
        assert!(lines.is_empty());
        GraphExporter::tree_lines(&tables, 0, &mut lines);
        assert_eq!(lines, vec!["root".to_string()]);

        let dot = GraphExporter::to_dot(&tables);
        assert!(dot.contains("n1 [label=\"A\", shape=ellipse];"));
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(GraphExporter::escape_label("a\"b"), "a\\\"b");
    }
}
