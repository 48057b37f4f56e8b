use crate::types::Date;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt};

///
/// TextMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextMode {
    Cs, // case-sensitive
    Ci, // case-insensitive
}

///
/// Value
///
/// Runtime representation shared by constants in the expression tree and by
/// the row instances the evaluator walks. `Record` doubles as the instance
/// shape: a predicate over type `T` evaluates against a `Value::Record`
/// whose keys are `T`'s field names.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(Date),
    Record(BTreeMap<String, Value>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a record value from `(name, value)` pairs.
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Read a field from a record value.
    ///
    /// Missing fields and field access on non-record values (including
    /// `Null`, for broken chains) both read as `Null`.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        match self {
            Self::Record(fields) => fields.get(name).cloned().unwrap_or(Self::Null),
            _ => Self::Null,
        }
    }

    /// True when this is a record and every one of its fields is `Null`.
    /// Non-record values are never considered all-null.
    #[must_use]
    pub fn record_all_null(&self) -> bool {
        match self {
            Self::Record(fields) => fields.values().all(Self::is_null),
            _ => false,
        }
    }

    /// Ordering between two values of the same kind.
    ///
    /// `None` for cross-kind pairs, records, and any comparison involving
    /// `Null`; the evaluator treats an undefined ordering as a non-match.
    #[must_use]
    pub fn compare_order(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Substring containment; defined only when both sides are text.
    #[must_use]
    pub fn text_contains(&self, needle: &Self, mode: TextMode) -> Option<bool> {
        match (self, needle) {
            (Self::Text(haystack), Self::Text(needle)) => Some(match mode {
                TextMode::Cs => haystack.contains(needle),
                TextMode::Ci => haystack.to_lowercase().contains(&needle.to_lowercase()),
            }),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "\"{v}\""),
            Self::Date(v) => write!(f, "{v}"),
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

///
/// TESTS
///
