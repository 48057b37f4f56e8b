use crate::{
    expr::{Expr, FieldAccess, Predicate, RootRef},
    schema::{FieldKind, SchemaRegistry},
};
use thiserror::Error as ThisError;

///
/// RebindError
///
/// Fatal failures while re-targeting a predicate. A rebind either produces
/// a complete tree or fails as a whole; there is no partial result.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RebindError {
    #[error("target type '{name}' is not registered in the schema")]
    UnknownType { name: String },

    #[error("field '{field}' has no counterpart on type '{type_name}'")]
    IncompatibleSchema { field: String, type_name: String },
}

///
/// ParameterRebinder
///
/// Structural visitor that substitutes one root reference for another and
/// re-resolves every field access under the new root's type. Depth-first,
/// deterministic, and pure; constants pass through untouched and composite
/// nodes are rebuilt with their operator preserved.
///

pub struct ParameterRebinder<'a> {
    registry: &'a SchemaRegistry,
    old_root: &'a RootRef,
    new_root: &'a RootRef,
}

impl<'a> ParameterRebinder<'a> {
    #[must_use]
    pub const fn new(
        registry: &'a SchemaRegistry,
        old_root: &'a RootRef,
        new_root: &'a RootRef,
    ) -> Self {
        Self {
            registry,
            old_root,
            new_root,
        }
    }

    pub fn rebind(&self, expr: &Expr) -> Result<Expr, RebindError> {
        match expr {
            Expr::Root(root) if root == self.old_root => {
                Ok(Expr::Root(self.new_root.clone()))
            }
            Expr::Root(root) => Ok(Expr::Root(root.clone())),

            Expr::Constant(value) => Ok(Expr::Constant(value.clone())),

            Expr::Field(access) => self.rebind_field(access),

            Expr::Compare { left, op, right } => Ok(Expr::Compare {
                left: Box::new(self.rebind(left)?),
                op: *op,
                right: Box::new(self.rebind(right)?),
            }),

            Expr::Contains { haystack, needle } => Ok(Expr::Contains {
                haystack: Box::new(self.rebind(haystack)?),
                needle: Box::new(self.rebind(needle)?),
            }),

            Expr::Logic { left, op, right } => Ok(Expr::Logic {
                left: Box::new(self.rebind(left)?),
                op: *op,
                right: Box::new(self.rebind(right)?),
            }),
        }
    }

    /// Rebind the target first, then look the same field name up on the
    /// rebound target's type. Chains below the root re-resolve too: record
    /// types are shared between schemas, so an inner step that survived the
    /// root swap resolves to the same kinds it had before.
    fn rebind_field(&self, access: &FieldAccess) -> Result<Expr, RebindError> {
        let target = self.rebind(&access.target)?;

        let type_name = match target.resolved_kind() {
            Some(FieldKind::Record(name)) => name,
            kind => {
                // A field access hanging off a non-record node cannot exist
                // in a well-formed tree; treat it as a schema mismatch.
                return Err(RebindError::IncompatibleSchema {
                    field: access.field.clone(),
                    type_name: kind.map_or_else(|| "unknown".to_string(), |k| k.to_string()),
                });
            }
        };

        let model =
            self.registry
                .get(&type_name)
                .ok_or_else(|| RebindError::UnknownType {
                    name: type_name.clone(),
                })?;

        let kind = model
            .field_kind(&access.field)
            .ok_or_else(|| RebindError::IncompatibleSchema {
                field: access.field.clone(),
                type_name: type_name.clone(),
            })?;

        Ok(Expr::Field(FieldAccess {
            target: Box::new(target),
            field: access.field.clone(),
            kind: kind.clone(),
        }))
    }
}

/// Re-target a compiled predicate onto `target_type`.
///
/// The new root keeps the source root's symbolic name (readability only).
/// On any [`RebindError`] the whole transformation aborts; no partial
/// predicate is produced. Cost is proportional to the source tree size.
pub fn transform(
    registry: &SchemaRegistry,
    predicate: &Predicate,
    target_type: &str,
) -> Result<Predicate, RebindError> {
    if !registry.contains(target_type) {
        return Err(RebindError::UnknownType {
            name: target_type.to_string(),
        });
    }

    let new_root = RootRef::new(target_type, predicate.root().name.clone());
    let rebinder = ParameterRebinder::new(registry, predicate.root(), &new_root);
    let body = rebinder.rebind(predicate.body())?;

    Ok(Predicate::new(new_root, body))
}

///
/// TESTS
///
