use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// FieldKind
///
/// Minimal type surface needed by path resolution, the builder's criterion
/// checks, and rebinding. `Record` references another registered type by
/// name; everything else is a scalar.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Bool,
    Int,
    Text,
    Date,
    Record(String),
}

impl FieldKind {
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Self::Date)
    }

    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "text"),
            Self::Date => write!(f, "date"),
            Self::Record(name) => write!(f, "{name}"),
        }
    }
}

///
/// FieldModel
///
/// One `(name, kind)` entry of a type descriptor.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldModel {
    pub name: String,
    pub kind: FieldKind,
}

///
/// TypeModel
///
/// Ordered field metadata for one host type. This is the explicit schema
/// descriptor the resolver and rebinder look fields up against instead of
/// runtime introspection; hosts construct it by hand or generate it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeModel {
    name: String,
    fields: Vec<FieldModel>,
}

impl TypeModel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field descriptor. Later entries shadow earlier ones of the
    /// same name during lookup; descriptors are expected to be duplicate-free.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldModel {
            name: name.into(),
            kind,
        });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldModel] {
        &self.fields
    }

    /// Look up a field's declared kind by name.
    #[must_use]
    pub fn field_kind(&self, name: &str) -> Option<&FieldKind> {
        self.fields
            .iter()
            .rev()
            .find(|field| field.name == name)
            .map(|field| &field.kind)
    }
}

///
/// SchemaRegistry
///
/// Mapping from type name to descriptor; the only schema surface the
/// resolver and rebinder depend on. Registering a descriptor under an
/// already-present name replaces the previous one.
///

#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    types: BTreeMap<String, TypeModel>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: TypeModel) -> &mut Self {
        self.types.insert(model.name().to_string(), model);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeModel> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Convenience lookup straight to a field's kind.
    #[must_use]
    pub fn field_kind(&self, type_name: &str, field: &str) -> Option<&FieldKind> {
        self.get(type_name)?.field_kind(field)
    }

    /// True when `instance` is a record whose non-null fields all carry a
    /// value matching the declared kind of a same-named field on `type_name`.
    /// Intended for host-side sanity checks before evaluation; the evaluator
    /// itself never consults the schema.
    #[must_use]
    pub fn instance_matches(&self, type_name: &str, instance: &Value) -> bool {
        let Some(model) = self.get(type_name) else {
            return false;
        };
        let Value::Record(fields) = instance else {
            return false;
        };

        fields.iter().all(|(name, value)| {
            model
                .field_kind(name)
                .is_some_and(|kind| value_matches_kind(value, kind))
        })
    }
}

fn value_matches_kind(value: &Value, kind: &FieldKind) -> bool {
    match (value, kind) {
        (Value::Null, _) => true,
        (Value::Bool(_), FieldKind::Bool)
        | (Value::Int(_), FieldKind::Int)
        | (Value::Text(_), FieldKind::Text)
        | (Value::Date(_), FieldKind::Date)
        | (Value::Record(_), FieldKind::Record(_)) => true,
        _ => false,
    }
}

///
/// TESTS
///
