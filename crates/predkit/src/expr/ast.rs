use crate::{schema::FieldKind, value::Value};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{BitAnd, BitOr},
};

///
/// Expression AST
///
/// Pure representation of filter predicates: a closed set of node kinds the
/// builder assembles and the rebinder rewrites. Nodes are immutable once
/// constructed and form a tree with no sharing or back-references; all
/// interpretation lives in the evaluator.
///

///
/// RootRef
///
/// The single free variable of a predicate: "the instance being tested".
/// `name` is purely symbolic (it shows up in rendered expressions) and has
/// no semantic effect.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RootRef {
    pub type_name: String,
    pub name: String,
}

impl RootRef {
    pub const DEFAULT_NAME: &'static str = "item";

    #[must_use]
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gte,
    Lte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gte => ">=",
            Self::Lte => "<=",
        };
        write!(f, "{symbol}")
    }
}

///
/// LogicOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LogicOp {
    And,
    Or,
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{symbol}")
    }
}

///
/// FieldAccess
///
/// One dereference step of a chain rooted at `RootRef`. `kind` is the
/// declared kind of `field` on the target's type, fixed at resolution time.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldAccess {
    pub target: Box<Expr>,
    pub field: String,
    pub kind: FieldKind,
}

///
/// Expr
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Expr {
    Root(RootRef),
    Field(FieldAccess),
    Constant(Value),
    Compare {
        left: Box<Self>,
        op: CompareOp,
        right: Box<Self>,
    },
    Contains {
        haystack: Box<Self>,
        needle: Box<Self>,
    },
    Logic {
        left: Box<Self>,
        op: LogicOp,
        right: Box<Self>,
    },
}

impl Expr {
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    #[must_use]
    pub fn compare(left: Self, op: CompareOp, right: Self) -> Self {
        Self::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn contains(haystack: Self, needle: Self) -> Self {
        Self::Contains {
            haystack: Box::new(haystack),
            needle: Box::new(needle),
        }
    }

    #[must_use]
    pub fn and(left: Self, right: Self) -> Self {
        Self::Logic {
            left: Box::new(left),
            op: LogicOp::And,
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn or(left: Self, right: Self) -> Self {
        Self::Logic {
            left: Box::new(left),
            op: LogicOp::Or,
            right: Box::new(right),
        }
    }

    /// Not-null guard: `expr != null`.
    #[must_use]
    pub fn not_null(expr: Self) -> Self {
        Self::compare(expr, CompareOp::Ne, Self::Constant(Value::Null))
    }

    /// Resolved value kind of this node.
    ///
    /// `None` for constants whose kind is not expressible in the schema
    /// vocabulary (`Null`, record literals).
    #[must_use]
    pub fn resolved_kind(&self) -> Option<FieldKind> {
        match self {
            Self::Root(root) => Some(FieldKind::Record(root.type_name.clone())),
            Self::Field(access) => Some(access.kind.clone()),
            Self::Constant(value) => match value {
                Value::Bool(_) => Some(FieldKind::Bool),
                Value::Int(_) => Some(FieldKind::Int),
                Value::Text(_) => Some(FieldKind::Text),
                Value::Date(_) => Some(FieldKind::Date),
                Value::Null | Value::Record(_) => None,
            },
            Self::Compare { .. } | Self::Contains { .. } | Self::Logic { .. } => {
                Some(FieldKind::Bool)
            }
        }
    }
}

impl BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::and(self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::or(self, rhs)
    }
}

///
/// Predicate
///
/// A boolean expression tree bound to one root type, callable as a filter
/// via [`Predicate::matches`]. Immutable once produced; the caller owns it
/// and may share it freely across threads.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Predicate {
    root: RootRef,
    body: Expr,
}

impl Predicate {
    pub(crate) fn new(root: RootRef, body: Expr) -> Self {
        debug_assert!(
            matches!(body.resolved_kind(), Some(FieldKind::Bool)),
            "predicate body must resolve to boolean"
        );

        Self { root, body }
    }

    #[must_use]
    pub const fn root(&self) -> &RootRef {
        &self.root
    }

    #[must_use]
    pub const fn body(&self) -> &Expr {
        &self.body
    }
}

///
/// TESTS
///
