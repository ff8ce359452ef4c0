//! Binary encoding of the flat tables.
//!
//! Layout (all fields i32, little-endian):
//!
//! ```text
//! header:   root_id | node_count | offset_children | offset_edges | offset_labels
//! children: child_count[node_count]  | child ids (id order)
//! edges:    edge_count[node_count]   | edge-kind tags (id order)
//! labels:   label_len[node_count]    | raw label bytes (id order, no separator)
//! ```

use crate::domain::serializer::FlatTables;
use crate::error::{ExtractError, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Width of every integer field in the buffer.
pub const FIELD_SIZE: usize = 4;
/// Five header fields.
pub const HEADER_SIZE: usize = 5 * FIELD_SIZE;

/// Header values and total size of an encoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    pub root_id: i32,
    pub node_count: i32,
    pub offset_children: i32,
    pub offset_edges: i32,
    pub offset_labels: i32,
    pub total_size: i32,
}

impl BufferLayout {
    /// Compute offsets for `tables`, failing if any value leaves i32 range.
    pub fn compute(tables: &FlatTables) -> Result<Self> {
        let node_count = tables.node_count();
        check_rows(tables)?;

        let child_total = tables.children.iter().map(Vec::len).sum::<usize>();
        let edge_total = tables.edge_kinds.iter().map(Vec::len).sum::<usize>();
        let label_total = tables.labels.iter().map(String::len).sum::<usize>();

        let children_size = section_size(node_count, words(child_total, "child ids")?, "children section")?;
        let edges_size = section_size(node_count, words(edge_total, "edge kinds")?, "edge section")?;
        let labels_size = section_size(node_count, label_total, "labels section")?;

        let offset_children = HEADER_SIZE;
        let offset_edges = add(offset_children, children_size, "offset_edges")?;
        let offset_labels = add(offset_edges, edges_size, "offset_labels")?;
        let total_size = add(offset_labels, labels_size, "total size")?;

        // Per-row counts are bounded by the section totals checked above.
        for label in &tables.labels {
            fit(label.len(), "label length")?;
        }

        Ok(Self {
            root_id: fit(tables.root_id, "root id")?,
            node_count: fit(node_count, "node count")?,
            offset_children: fit(offset_children, "offset_children")?,
            offset_edges: fit(offset_edges, "offset_edges")?,
            offset_labels: fit(offset_labels, "offset_labels")?,
            total_size: fit(total_size, "total size")?,
        })
    }
}

/// Pack `tables` into one contiguous buffer.
pub fn encode(tables: &FlatTables) -> Result<Vec<u8>> {
    let layout = BufferLayout::compute(tables)?;
    let mut buf = Vec::with_capacity(layout.total_size as usize);

    for field in [
        layout.root_id,
        layout.node_count,
        layout.offset_children,
        layout.offset_edges,
        layout.offset_labels,
    ] {
        buf.write_i32::<LittleEndian>(field)?;
    }

    debug_assert_eq!(buf.len(), layout.offset_children as usize);
    for row in &tables.children {
        buf.write_i32::<LittleEndian>(row.len() as i32)?;
    }
    for row in &tables.children {
        for &child in row {
            buf.write_i32::<LittleEndian>(fit(child, "child id")?)?;
        }
    }

    debug_assert_eq!(buf.len(), layout.offset_edges as usize);
    for row in &tables.edge_kinds {
        buf.write_i32::<LittleEndian>(row.len() as i32)?;
    }
    for row in &tables.edge_kinds {
        for kind in row {
            buf.write_i32::<LittleEndian>(kind.tag())?;
        }
    }

    debug_assert_eq!(buf.len(), layout.offset_labels as usize);
    for label in &tables.labels {
        buf.write_i32::<LittleEndian>(label.len() as i32)?;
    }
    for label in &tables.labels {
        buf.write_all(label.as_bytes())?;
    }

    debug_assert_eq!(buf.len(), layout.total_size as usize);
    Ok(buf)
}

fn check_rows(tables: &FlatTables) -> Result<()> {
    for (node, (ids, kinds)) in tables.children.iter().zip(&tables.edge_kinds).enumerate() {
        if ids.len() != kinds.len() {
            return Err(ExtractError::MisalignedRow {
                node,
                children: ids.len(),
                edges: kinds.len(),
            });
        }
    }
    let rows = tables.node_count();
    if tables.children.len() != rows || tables.edge_kinds.len() != rows {
        return Err(ExtractError::MisalignedRow {
            node: rows,
            children: tables.children.len(),
            edges: tables.edge_kinds.len(),
        });
    }
    if tables.root_id >= rows {
        return Err(ExtractError::DanglingId {
            what: "root id",
            id: tables.root_id,
            node_count: rows,
        });
    }
    for row in &tables.children {
        if let Some(&id) = row.iter().find(|&&id| id >= rows) {
            return Err(ExtractError::DanglingId {
                what: "child id",
                id,
                node_count: rows,
            });
        }
    }
    Ok(())
}

fn fit(value: usize, what: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| ExtractError::BufferOverflow { what, value })
}

fn words(count: usize, what: &'static str) -> Result<usize> {
    count
        .checked_mul(FIELD_SIZE)
        .ok_or(ExtractError::BufferOverflow { what, value: count })
}

fn add(a: usize, b: usize, what: &'static str) -> Result<usize> {
    a.checked_add(b)
        .ok_or(ExtractError::BufferOverflow { what, value: usize::MAX })
}

fn section_size(node_count: usize, payload: usize, what: &'static str) -> Result<usize> {
    add(words(node_count, what)?, payload, what)
}
