// Program representation for loopnest_graph.
// A small loop-nest IR in the shape the structural scanner walks: statements
// own their bodies, expressions own their operands.

use serde::{Deserialize, Serialize};

/// A scalar variable (loop induction variable, buffer handle, let binding).
///
/// Two variables are the same variable when both name and id match; `id`
/// disambiguates distinct variables that share a name hint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    #[serde(default)]
    pub id: u32,
}

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: 0,
        }
    }

    pub fn with_id(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Execution kind of a `for` loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForKind {
    #[default]
    Serial,
    Parallel,
    Vectorized,
    Unrolled,
}

/// Binary operators of index and value expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    FloorDiv,
    FloorMod,
    Min,
    Max,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Var(Var),
    Int {
        value: i64,
    },
    Float {
        value: f64,
    },
    Binary {
        op: BinaryOp,
        a: Box<Expr>,
        b: Box<Expr>,
    },
    Select {
        condition: Box<Expr>,
        true_value: Box<Expr>,
        false_value: Box<Expr>,
    },
    Load {
        buffer_var: Var,
        index: Box<Expr>,
        #[serde(default)]
        predicate: Option<Box<Expr>>,
    },
    Call {
        name: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(Var::new(name))
    }

    pub fn int(value: i64) -> Self {
        Expr::Int { value }
    }

    pub fn binary(op: BinaryOp, a: Expr, b: Expr) -> Self {
        Expr::Binary {
            op,
            a: Box::new(a),
            b: Box::new(b),
        }
    }

    pub fn load(buffer: impl Into<String>, index: Expr) -> Self {
        Expr::Load {
            buffer_var: Var::new(buffer),
            index: Box::new(index),
            predicate: None,
        }
    }

    /// Constant value, if this is an integer immediate.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int { value } => Some(*value),
            _ => None,
        }
    }
}

/// Statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    For {
        loop_var: Var,
        #[serde(default = "zero")]
        min: Expr,
        extent: Expr,
        #[serde(default)]
        for_kind: ForKind,
        body: Box<Stmt>,
    },
    /// Scoped attribute. `thread_extent` and `virtual_thread` keys bind a
    /// thread iteration variable over `value` iterations.
    Attr {
        attr_key: String,
        #[serde(default)]
        iter_var: Option<Var>,
        #[serde(default)]
        thread_tag: String,
        value: Expr,
        body: Box<Stmt>,
    },
    Store {
        buffer_var: Var,
        value: Expr,
        index: Expr,
        #[serde(default)]
        predicate: Option<Expr>,
    },
    Let {
        var: Var,
        value: Expr,
        body: Box<Stmt>,
    },
    IfThenElse {
        condition: Expr,
        then_case: Box<Stmt>,
        #[serde(default)]
        else_case: Option<Box<Stmt>>,
    },
    Seq {
        stmts: Vec<Stmt>,
    },
    Evaluate {
        value: Expr,
    },
}

fn zero() -> Expr {
    Expr::int(0)
}

impl Stmt {
    /// Serial loop `for var in [0, extent)`.
    pub fn for_loop(var: impl Into<String>, extent: i64, body: Stmt) -> Self {
        Stmt::For {
            loop_var: Var::new(var),
            min: Expr::int(0),
            extent: Expr::int(extent),
            for_kind: ForKind::Serial,
            body: Box::new(body),
        }
    }

    pub fn store(buffer: impl Into<String>, index: Expr, value: Expr) -> Self {
        Stmt::Store {
            buffer_var: Var::new(buffer),
            value,
            index,
            predicate: None,
        }
    }

    pub fn seq(stmts: Vec<Stmt>) -> Self {
        Stmt::Seq { stmts }
    }

    /// Empty program.
    pub fn empty() -> Self {
        Stmt::Seq { stmts: Vec::new() }
    }

    /// Decode a program from its JSON form.
    pub fn from_json(src: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(src)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_for_with_defaults() {
        let src = r#"{
            "kind": "for",
            "loop_var": {"name": "i"},
            "extent": {"kind": "int", "value": 16},
            "body": {"kind": "seq", "stmts": []}
        }"#;
        let stmt = Stmt::from_json(src).unwrap();
        match stmt {
            Stmt::For { loop_var, min, for_kind, .. } => {
                assert_eq!(loop_var, Var::new("i"));
                assert_eq!(min.as_int(), Some(0));
                assert_eq!(for_kind, ForKind::Serial);
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let src = r#"{"kind": "while", "body": {"kind": "seq", "stmts": []}}"#;
        assert!(Stmt::from_json(src).is_err());
    }

    #[test]
    fn test_var_identity_uses_id() {
        assert_ne!(Var::with_id("i", 0), Var::with_id("i", 1));
        assert!(Var::with_id("i", 0) < Var::with_id("j", 0));
    }
}
