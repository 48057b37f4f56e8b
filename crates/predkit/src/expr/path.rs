use crate::{
    expr::{Expr, FieldAccess, RootRef},
    schema::{FieldKind, SchemaRegistry},
};
use thiserror::Error as ThisError;

///
/// ResolveError
///
/// Fatal lookup failures while walking a dotted property path. Surfaced
/// synchronously to the caller; resolution never partially succeeds.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResolveError {
    #[error("type '{name}' is not registered in the schema")]
    UnknownType { name: String },

    #[error("field '{field}' is not defined on type '{type_name}'")]
    UnknownField { type_name: String, field: String },
}

/// Resolve a dotted chain of field names against a root reference.
///
/// An empty chain returns the root expression itself (the predicate will
/// reference the root directly). Otherwise each name is looked up on the
/// current node's declared type, producing one `FieldAccess` per step.
/// Cost is O(chain length) with one map lookup per step; nothing is cached.
pub fn resolve(
    registry: &SchemaRegistry,
    root: &RootRef,
    names: &[&str],
) -> Result<Expr, ResolveError> {
    let mut node = Expr::Root(root.clone());
    let mut kind = FieldKind::Record(root.type_name.clone());

    for name in names {
        // Scalars expose no fields; report the lookup against the scalar's
        // kind name so the message points at the offending step.
        let FieldKind::Record(type_name) = &kind else {
            return Err(ResolveError::UnknownField {
                type_name: kind.to_string(),
                field: (*name).to_string(),
            });
        };

        let model = registry
            .get(type_name)
            .ok_or_else(|| ResolveError::UnknownType {
                name: type_name.clone(),
            })?;

        let found = model
            .field_kind(name)
            .ok_or_else(|| ResolveError::UnknownField {
                type_name: type_name.clone(),
                field: (*name).to_string(),
            })?;

        kind = found.clone();
        node = Expr::Field(FieldAccess {
            target: Box::new(node),
            field: (*name).to_string(),
            kind: kind.clone(),
        });
    }

    Ok(node)
}

///
/// TESTS
///
