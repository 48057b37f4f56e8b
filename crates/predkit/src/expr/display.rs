use crate::expr::{Expr, Predicate};
use std::fmt;

///
/// Human-readable rendering of expression trees, e.g.
/// `item => ((item.name != null) && contains(item.name, "ann"))`.
/// Diagnostic only; not a parseable syntax.
///

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(root) => write!(f, "{}", root.name),
            Self::Field(access) => write!(f, "{}.{}", access.target, access.field),
            Self::Constant(value) => write!(f, "{value}"),
            Self::Compare { left, op, right } => write!(f, "({left} {op} {right})"),
            Self::Contains { haystack, needle } => write!(f, "contains({haystack}, {needle})"),
            Self::Logic { left, op, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.root().name, self.body())
    }
}

///
/// TESTS
///
