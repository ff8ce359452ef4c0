use crate::domain::annotation::Annotation;
use crate::domain::program::{Expr, Stmt, Var};

pub mod graph_exporter;

/// Receiver of the ordered structural events of one program scan.
///
/// Loop and memory scopes nest strictly: every `enter_*` is matched by the
/// `exit_*` of the same kind before its enclosing scope exits.
pub trait ScopeVisitor {
    fn enter_loop(&mut self, var: &Var, trip_count: i64, annotation: Annotation);
    fn exit_loop(&mut self);
    fn enter_mem(&mut self, buffer_var: &Var, index: &Expr);
    fn exit_mem(&mut self);
}

/// Walks a program and drives a `ScopeVisitor`.
pub trait ProgramScanner {
    fn scan(&self, stmt: &Stmt, visitor: &mut dyn ScopeVisitor);
}
