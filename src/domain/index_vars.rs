//! Index-variable collection.
//!
//! Gathers the distinct scalar variables an index expression reads.

use crate::domain::program::{Expr, Var};
use std::collections::BTreeSet;

/// Collects distinct variables referenced by an expression.
///
/// Iteration order is `Var`'s ordering (name, then id), so the result is the
/// same on every run regardless of where in the expression a variable occurs.
#[derive(Debug, Default)]
pub struct IndexVarCollector<'a> {
    vars: BTreeSet<&'a Var>,
}

impl<'a> IndexVarCollector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the variables of `expr` into this collector.
    pub fn collect(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Var(var) => {
                self.vars.insert(var);
            }
            Expr::Int { .. } | Expr::Float { .. } => {}
            Expr::Binary { a, b, .. } => {
                self.collect(a);
                self.collect(b);
            }
            Expr::Select {
                condition,
                true_value,
                false_value,
            } => {
                self.collect(condition);
                self.collect(true_value);
                self.collect(false_value);
            }
            // The buffer handle of an indirect load is not an index variable.
            Expr::Load {
                index, predicate, ..
            } => {
                self.collect(index);
                if let Some(predicate) = predicate {
                    self.collect(predicate);
                }
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    self.collect(arg);
                }
            }
        }
    }

    pub fn into_vars(self) -> Vec<&'a Var> {
        self.vars.into_iter().collect()
    }
}

/// Distinct variables of `expr` in deterministic order.
pub fn collect_index_vars(expr: &Expr) -> Vec<&Var> {
    let mut collector = IndexVarCollector::new();
    collector.collect(expr);
    collector.into_vars()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::program::BinaryOp;

    fn names(expr: &Expr) -> Vec<String> {
        collect_index_vars(expr)
            .into_iter()
            .map(|v| v.name.clone())
            .collect()
    }

    #[test]
    fn test_constant_has_no_vars() {
        assert!(names(&Expr::int(3)).is_empty());
    }

    #[test]
    fn test_duplicates_collapse_and_sort() {
        // j * 16 + i + j
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::binary(
                BinaryOp::Add,
                Expr::binary(BinaryOp::Mul, Expr::var("j"), Expr::int(16)),
                Expr::var("i"),
            ),
            Expr::var("j"),
        );
        assert_eq!(names(&expr), vec!["i", "j"]);
    }

    #[test]
    fn test_indirect_load_skips_buffer() {
        // idx[k] + i
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::load("idx", Expr::var("k")),
            Expr::var("i"),
        );
        assert_eq!(names(&expr), vec!["i", "k"]);
    }

    #[test]
    fn test_same_name_different_identity() {
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::Var(Var::with_id("i", 2)),
            Expr::Var(Var::with_id("i", 1)),
        );
        let vars = collect_index_vars(&expr);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].id, 1);
        assert_eq!(vars[1].id, 2);
    }
}
