//! Structural scanner over the loop-nest program representation.
//!
//! Emits loop scopes for `for` loops and thread-binding attributes, and
//! memory scopes for every store and load, in program order.

use crate::domain::annotation::Annotation;
use crate::domain::program::{Expr, Stmt};
use crate::ports::{ProgramScanner, ScopeVisitor};

/// Attribute keys that bind a thread iteration variable.
pub const THREAD_EXTENT: &str = "thread_extent";
pub const VIRTUAL_THREAD: &str = "virtual_thread";

/// Trip count reported for loops whose extent is not a constant.
pub const UNKNOWN_TRIP_COUNT: i64 = -1;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureScanner;

impl ProgramScanner for FeatureScanner {
    fn scan(&self, stmt: &Stmt, visitor: &mut dyn ScopeVisitor) {
        visit_stmt(stmt, visitor);
    }
}

fn trip_count(extent: &Expr) -> i64 {
    extent.as_int().unwrap_or(UNKNOWN_TRIP_COUNT)
}

fn visit_stmt(stmt: &Stmt, visitor: &mut dyn ScopeVisitor) {
    match stmt {
        Stmt::For {
            loop_var,
            min,
            extent,
            for_kind,
            body,
        } => {
            // bounds belong to the loop scope they open
            visitor.enter_loop(loop_var, trip_count(extent), (*for_kind).into());
            visit_expr(min, visitor);
            visit_expr(extent, visitor);
            visit_stmt(body, visitor);
            visitor.exit_loop();
        }
        Stmt::Attr {
            attr_key,
            iter_var: Some(var),
            thread_tag,
            value,
            body,
        } if attr_key == THREAD_EXTENT || attr_key == VIRTUAL_THREAD => {
            let annotation = if attr_key == VIRTUAL_THREAD {
                Annotation::VirtualThread
            } else {
                Annotation::from_thread_tag(thread_tag)
            };
            visitor.enter_loop(var, trip_count(value), annotation);
            visit_expr(value, visitor);
            visit_stmt(body, visitor);
            visitor.exit_loop();
        }
        Stmt::Attr { value, body, .. } => {
            visit_expr(value, visitor);
            visit_stmt(body, visitor);
        }
        Stmt::Store {
            buffer_var,
            value,
            index,
            predicate,
        } => {
            visitor.enter_mem(buffer_var, index);
            visit_expr(value, visitor);
            visit_expr(index, visitor);
            if let Some(predicate) = predicate {
                visit_expr(predicate, visitor);
            }
            visitor.exit_mem();
        }
        Stmt::Let { value, body, .. } => {
            visit_expr(value, visitor);
            visit_stmt(body, visitor);
        }
        Stmt::IfThenElse {
            condition,
            then_case,
            else_case,
        } => {
            visit_expr(condition, visitor);
            visit_stmt(then_case, visitor);
            if let Some(else_case) = else_case {
                visit_stmt(else_case, visitor);
            }
        }
        Stmt::Seq { stmts } => {
            for s in stmts {
                visit_stmt(s, visitor);
            }
        }
        Stmt::Evaluate { value } => visit_expr(value, visitor),
    }
}

fn visit_expr(expr: &Expr, visitor: &mut dyn ScopeVisitor) {
    match expr {
        Expr::Var(_) | Expr::Int { .. } | Expr::Float { .. } => {}
        Expr::Binary { a, b, .. } => {
            visit_expr(a, visitor);
            visit_expr(b, visitor);
        }
        Expr::Select {
            condition,
            true_value,
            false_value,
        } => {
            visit_expr(condition, visitor);
            visit_expr(true_value, visitor);
            visit_expr(false_value, visitor);
        }
        Expr::Load {
            buffer_var,
            index,
            predicate,
        } => {
            visitor.enter_mem(buffer_var, index);
            visit_expr(index, visitor);
            if let Some(predicate) = predicate {
                visit_expr(predicate, visitor);
            }
            visitor.exit_mem();
        }
        Expr::Call { args, .. } => {
            for arg in args {
                visit_expr(arg, visitor);
            }
        }
    }
}
