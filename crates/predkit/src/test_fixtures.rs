use crate::{
    schema::{FieldKind, SchemaRegistry, TypeModel},
    types::Date,
    value::Value,
};

///
/// Shared test schemas: a domain type, a structurally-overlapping view type
/// (no `label`), and the nested record both share.
///

pub(crate) fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    registry.register(
        TypeModel::new("Person")
            .field("id", FieldKind::Int)
            .field("name", FieldKind::Text)
            .field("label", FieldKind::Text)
            .field("joined", FieldKind::Date)
            .field("personal", FieldKind::Record("PersonalData".to_string())),
    );

    registry.register(
        TypeModel::new("PersonView")
            .field("id", FieldKind::Int)
            .field("name", FieldKind::Text)
            .field("joined", FieldKind::Date)
            .field("personal", FieldKind::Record("PersonalData".to_string())),
    );

    registry.register(
        TypeModel::new("PersonalData")
            .field("first_name", FieldKind::Text)
            .field("birth_date", FieldKind::Date),
    );

    registry
}

/// Row instance with `name` and `joined` populated or null.
pub(crate) fn person(name: Option<&str>, joined: Option<Date>) -> Value {
    Value::record([
        ("id", Value::from(1i64)),
        ("name", name.map_or(Value::Null, Value::from)),
        ("joined", joined.map_or(Value::Null, Value::from)),
    ])
}
