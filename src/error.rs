//! Error types for loopnest_graph.
//!
//! Every failure of an extraction call is fatal: the builder and the encoder
//! never hand back a partially built graph or a truncated buffer.

use thiserror::Error;

/// Main error type for graph extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// An exit event arrived with no open scope to close.
    #[error("scope underflow: {event} with no open scope")]
    ScopeUnderflow { event: &'static str },

    /// An exit event closed a scope of the other kind.
    #[error("scope mismatch: {event} closed a {found} scope")]
    ScopeMismatch {
        event: &'static str,
        found: &'static str,
    },

    /// Traversal finished with scopes still open.
    #[error("unterminated scopes: {open} scope(s) still open at end of traversal")]
    UnterminatedScopes { open: usize },

    /// A count, offset or total size does not fit the 4-byte field width.
    #[error("buffer overflow: {what} ({value}) exceeds i32 range")]
    BufferOverflow { what: &'static str, value: usize },

    /// Children and edge-kind rows of one node have different lengths.
    #[error("misaligned row {node}: {children} children but {edges} edge kinds")]
    MisalignedRow {
        node: usize,
        children: usize,
        edges: usize,
    },

    /// A root or child id names no row of the tables.
    #[error("dangling {what} {id}: tables hold only {node_count} node(s)")]
    DanglingId {
        what: &'static str,
        id: usize,
        node_count: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Program representation could not be decoded.
    #[error("Program error: {0}")]
    Program(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ExtractError::Config(msg.into())
    }
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
