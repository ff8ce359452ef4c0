//! Feature Graph Builder
//!
//! Turns the structural event stream of one program scan into a tree of
//! `GraphNode`s. Nodes live in an index arena while the scan is open so the
//! scope stack can refer to them; `finish` detaches the root-reachable part
//! into an owned tree.

use crate::domain::annotation::Annotation;
use crate::domain::graph::{EdgeKind, GraphNode, LOOP_LABEL, ROOT_LABEL};
use crate::domain::index_vars::collect_index_vars;
use crate::domain::program::{Expr, Var};
use crate::error::{ExtractError, Result};
use crate::ports::ScopeVisitor;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Root,
    Loop,
    Mem,
}

impl ScopeKind {
    fn name(self) -> &'static str {
        match self {
            ScopeKind::Root => "root",
            ScopeKind::Loop => "loop",
            ScopeKind::Mem => "memory",
        }
    }
}

#[derive(Debug)]
struct Scope {
    node: usize,
    kind: ScopeKind,
}

#[derive(Debug, Default)]
struct ArenaNode {
    label: String,
    children: Vec<(usize, EdgeKind)>,
}

/// Builds the feature graph from `ScopeVisitor` events.
#[derive(Debug)]
pub struct GraphBuilder {
    arena: Vec<ArenaNode>,
    stack: Vec<Scope>,
    /// First contract violation seen; later events are ignored.
    error: Option<ExtractError>,
    events: usize,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a builder whose scope stack holds only the synthetic root.
    pub fn new() -> Self {
        let mut builder = Self {
            arena: Vec::new(),
            stack: Vec::new(),
            error: None,
            events: 0,
        };
        let root = builder.alloc(ROOT_LABEL);
        builder.stack.push(Scope {
            node: root,
            kind: ScopeKind::Root,
        });
        builder
    }

    /// Number of scopes currently open, not counting the root.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    /// Close the scan and hand out the tree reachable from the root.
    ///
    /// Memory nodes that were never attached to a loop are dropped here. A
    /// scan that delivered no events at all yields a root with an empty
    /// label, so its buffer carries no payload bytes.
    pub fn finish(mut self) -> Result<GraphNode> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.stack.len() != 1 {
            return Err(ExtractError::UnterminatedScopes { open: self.depth() });
        }
        let mut root = detach(&mut self.arena, 0);
        if self.events == 0 {
            root.label.clear();
        }
        debug!(
            events = self.events,
            allocated = self.arena.len(),
            reachable = root.subtree_size(),
            "feature graph built"
        );
        Ok(root)
    }

    fn alloc(&mut self, label: impl Into<String>) -> usize {
        self.arena.push(ArenaNode {
            label: label.into(),
            children: Vec::new(),
        });
        self.arena.len() - 1
    }

    fn link(&mut self, parent: usize, child: usize) {
        self.arena[parent]
            .children
            .push((child, EdgeKind::Structural));
    }

    /// Nearest enclosing loop scope, innermost first.
    fn nearest_loop(&self) -> Option<usize> {
        self.stack
            .iter()
            .rev()
            .find(|scope| scope.kind == ScopeKind::Loop)
            .map(|scope| scope.node)
    }

    fn pop(&mut self, expected: ScopeKind, event: &'static str) {
        match self.stack.last().map(|scope| scope.kind) {
            None | Some(ScopeKind::Root) => {
                self.error = Some(ExtractError::ScopeUnderflow { event });
            }
            Some(kind) if kind != expected => {
                self.error = Some(ExtractError::ScopeMismatch {
                    event,
                    found: kind.name(),
                });
            }
            Some(_) => {
                self.stack.pop();
            }
        }
    }

    fn poisoned(&mut self) -> bool {
        self.events += 1;
        self.error.is_some()
    }
}

impl ScopeVisitor for GraphBuilder {
    fn enter_loop(&mut self, var: &Var, trip_count: i64, annotation: Annotation) {
        if self.poisoned() {
            return;
        }
        trace!(var = %var.name, trip_count, ?annotation, "enter loop");
        let node = self.alloc(LOOP_LABEL);
        let induction = self.alloc(var.name.as_str());
        self.link(node, induction);
        // The stack always holds at least the root while no error is recorded.
        if let Some(top) = self.stack.last().map(|scope| scope.node) {
            self.link(top, node);
        }
        self.stack.push(Scope {
            node,
            kind: ScopeKind::Loop,
        });
    }

    fn exit_loop(&mut self) {
        if self.poisoned() {
            return;
        }
        trace!("exit loop");
        self.pop(ScopeKind::Loop, "exit_loop");
    }

    fn enter_mem(&mut self, buffer_var: &Var, index: &Expr) {
        if self.poisoned() {
            return;
        }
        trace!(buffer = %buffer_var.name, "enter memory op");
        let node = self.alloc(buffer_var.name.as_str());
        for var in collect_index_vars(index) {
            let child = self.alloc(var.name.as_str());
            self.link(node, child);
        }
        match self.nearest_loop() {
            Some(parent) => self.link(parent, node),
            None => trace!(buffer = %buffer_var.name, "memory op outside any loop, left unattached"),
        }
        self.stack.push(Scope {
            node,
            kind: ScopeKind::Mem,
        });
    }

    fn exit_mem(&mut self) {
        if self.poisoned() {
            return;
        }
        trace!("exit memory op");
        self.pop(ScopeKind::Mem, "exit_mem");
    }
}

/// A node taken out of the arena whose children are still being detached.
struct Detaching {
    label: String,
    kind: EdgeKind,
    pending: std::vec::IntoIter<(usize, EdgeKind)>,
    done: Vec<(GraphNode, EdgeKind)>,
}

impl Detaching {
    fn take(arena: &mut [ArenaNode], index: usize, kind: EdgeKind) -> Self {
        let ArenaNode { label, children } = std::mem::take(&mut arena[index]);
        Self {
            label,
            kind,
            done: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        }
    }
}

/// Move the subtree at `index` out of the arena. Uses an explicit stack so
/// nesting depth is bounded by heap, not by the call stack.
fn detach(arena: &mut [ArenaNode], index: usize) -> GraphNode {
    let mut open = vec![Detaching::take(arena, index, EdgeKind::Structural)];
    let mut detached = GraphNode::new(String::new());

    while let Some(top) = open.last_mut() {
        if let Some((child, kind)) = top.pending.next() {
            open.push(Detaching::take(arena, child, kind));
            continue;
        }
        let Some(Detaching { label, kind, done, .. }) = open.pop() else {
            break;
        };
        let node = GraphNode {
            label,
            children: done,
        };
        match open.last_mut() {
            Some(parent) => parent.done.push((node, kind)),
            None => detached = node,
        }
    }
    detached
}
