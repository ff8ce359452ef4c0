use crate::domain::graph::EdgeKind;
use crate::domain::serializer::FlatTables;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GraphDto {
    pub root_id: usize,
    pub node_count: usize,
    pub nodes: Vec<NodeDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: usize,
    pub label: String,
    pub children: Vec<usize>,
    pub edges: Vec<EdgeKind>,
}

impl From<&FlatTables> for GraphDto {
    fn from(tables: &FlatTables) -> Self {
        let nodes = tables
            .labels
            .iter()
            .zip(&tables.children)
            .zip(&tables.edge_kinds)
            .enumerate()
            .map(|(id, ((label, children), edges))| NodeDto {
                id,
                label: label.clone(),
                children: children.clone(),
                edges: edges.clone(),
            })
            .collect();

        GraphDto {
            root_id: tables.root_id,
            node_count: tables.node_count(),
            nodes,
        }
    }
}
