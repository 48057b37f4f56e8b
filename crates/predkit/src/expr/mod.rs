pub mod path;

mod ast;
mod display;

pub use ast::{CompareOp, Expr, FieldAccess, LogicOp, Predicate, RootRef};
