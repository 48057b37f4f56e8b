//! Schema-aware filter predicates with cross-type rebinding: an explicit
//! boolean expression AST, a fluent accumulator assembling it from named
//! filter criteria addressed by dotted property paths, and a structural
//! visitor that re-targets a compiled predicate onto a structurally similar
//! type by re-resolving every field access against the new type's schema.
#![warn(unreachable_pub)]

pub mod build;
pub mod clock;
pub mod error;
pub mod expr;
pub mod rebind;
pub mod schema;
pub mod types;
pub mod value;

mod eval;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Domain vocabulary only; errors and helpers stay in their modules.
///

pub mod prelude {
    pub use crate::{
        build::{Condition, PredicateBuilder},
        expr::{CompareOp, Expr, LogicOp, Predicate, RootRef},
        rebind::transform,
        schema::{FieldKind, SchemaRegistry, TypeModel},
        types::Date,
        value::Value,
    };
}
