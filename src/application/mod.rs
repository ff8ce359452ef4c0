use crate::domain::builder::GraphBuilder;
use crate::domain::encoder::{encode, BufferLayout};
use crate::domain::graph::GraphNode;
use crate::domain::program::Stmt;
use crate::domain::serializer::FlatTables;
use crate::error::Result;
use crate::infrastructure::FeatureScanner;
use crate::ports::graph_exporter::GraphExporter;
use crate::ports::ProgramScanner;
use std::io::Write;
use tracing::info;

/// Output of one extraction call.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub tables: FlatTables,
    pub layout: BufferLayout,
    pub buffer: Vec<u8>,
}

pub struct ExtractUsecase<'a> {
    pub scanner: &'a dyn ProgramScanner,
}

impl<'a> ExtractUsecase<'a> {
    /// Scan, build, serialize and encode `stmt`.
    ///
    /// When `dump` is given, the text rendering is written to it after the
    /// buffer has been produced; it never changes the buffer.
    pub fn run(&self, stmt: &Stmt, dump: Option<&mut dyn Write>) -> Result<Extraction> {
        let root = self.build_graph(stmt)?;
        let tables = FlatTables::from_tree(&root);
        let layout = BufferLayout::compute(&tables)?;
        let buffer = encode(&tables)?;

        info!(
            nodes = tables.node_count(),
            bytes = buffer.len(),
            "feature graph extracted"
        );

        if let Some(out) = dump {
            out.write_all(GraphExporter::to_text(&tables, &layout).as_bytes())?;
        }

        Ok(Extraction {
            tables,
            layout,
            buffer,
        })
    }

    /// Scan `stmt` and return the built tree.
    pub fn build_graph(&self, stmt: &Stmt) -> Result<GraphNode> {
        let mut builder = GraphBuilder::new();
        self.scanner.scan(stmt, &mut builder);
        builder.finish()
    }
}

/// Extract the encoded feature graph of `stmt` with the default scanner,
/// optionally printing the text dump to stdout.
pub fn get_ir_graph(stmt: &Stmt, print_log: bool) -> Result<Vec<u8>> {
    let usecase = ExtractUsecase {
        scanner: &FeatureScanner,
    };
    let extraction = if print_log {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        usecase.run(stmt, Some(&mut lock))?
    } else {
        usecase.run(stmt, None)?
    };
    Ok(extraction.buffer)
}
