use crate::{
    expr::{
        CompareOp, Expr, Predicate, RootRef,
        path::{self, ResolveError},
    },
    schema::SchemaRegistry,
    types::Date,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// Condition
///
/// Combinator applied when a builder call must merge its clause with an
/// already-accumulated body. `None` is deliberately inert: with an existing
/// body the new clause is dropped and the body kept as-is, mirroring an
/// unrecognized combinator rather than raising an error.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Condition {
    #[default]
    And,
    Or,
    None,
}

///
/// BuildError
///
/// Fatal failures of a single builder call. Errors surface before any
/// mutation of the accumulated body, so a failed call leaves the builder
/// exactly as it was.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum BuildError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("search path '{path}' must resolve to a text field, found {kind}")]
    TextFieldExpected { path: String, kind: String },
}

///
/// PredicateBuilder
///
/// Mutable accumulator for filter criteria over one root type. Each call
/// appends to the body; `build` snapshots the state into an owned
/// [`Predicate`] and the builder keeps accumulating afterwards.
///
/// Not safe for concurrent mutation; confine an instance to one logical
/// construction flow or synchronize externally.
///

#[derive(Clone, Debug)]
pub struct PredicateBuilder<'a> {
    registry: &'a SchemaRegistry,
    root: RootRef,
    body: Option<Expr>,
}

impl<'a> PredicateBuilder<'a> {
    /// Builder over `type_name` with the default symbolic root name.
    pub fn new(registry: &'a SchemaRegistry, type_name: &str) -> Result<Self, BuildError> {
        Self::with_parameter(registry, type_name, RootRef::DEFAULT_NAME)
    }

    /// Builder over `type_name` with an explicit symbolic root name. The
    /// name only affects rendered expressions, never semantics.
    pub fn with_parameter(
        registry: &'a SchemaRegistry,
        type_name: &str,
        parameter: &str,
    ) -> Result<Self, BuildError> {
        if !registry.contains(type_name) {
            return Err(ResolveError::UnknownType {
                name: type_name.to_string(),
            }
            .into());
        }

        Ok(Self {
            registry,
            root: RootRef::new(type_name, parameter),
            body: None,
        })
    }

    /// Append a substring-search criterion on the text field at `path`:
    /// `field != null && contains(field, term)`.
    ///
    /// An empty `term` is a no-op. A path that resolves to a non-text field
    /// fails with [`BuildError::TextFieldExpected`].
    pub fn add_search(
        &mut self,
        term: &str,
        condition: Condition,
        path: &[&str],
    ) -> Result<&mut Self, BuildError> {
        if term.is_empty() {
            return Ok(self);
        }

        let field = path::resolve(self.registry, &self.root, path)?;
        if !field.resolved_kind().is_some_and(|kind| kind.is_text()) {
            return Err(BuildError::TextFieldExpected {
                path: path.join("."),
                kind: field
                    .resolved_kind()
                    .map_or_else(|| "unknown".to_string(), |kind| kind.to_string()),
            });
        }

        let clause = Expr::not_null(field.clone()) & Expr::contains(field, Expr::constant(term));
        self.combine(clause, condition);

        Ok(self)
    }

    /// Append a date-range criterion on the date field at `path`, guarded by
    /// a not-null check exactly like `add_search`.
    ///
    /// Silent no-ops: both bounds absent; both bounds present but at the
    /// `Date::MIN` "unset" sentinel; a path resolving to a non-date field
    /// (permissive by design). Bounds supplied in reverse order are swapped
    /// before comparisons are built.
    pub fn add_date(
        &mut self,
        date_from: Option<Date>,
        date_to: Option<Date>,
        condition: Condition,
        path: &[&str],
    ) -> Result<&mut Self, BuildError> {
        let unset = |date: Option<Date>| date.is_some_and(|d| d <= Date::MIN);
        if (date_from.is_none() && date_to.is_none()) || (unset(date_from) && unset(date_to)) {
            return Ok(self);
        }

        let field = path::resolve(self.registry, &self.root, path)?;
        if !field.resolved_kind().is_some_and(|kind| kind.is_date()) {
            return Ok(self);
        }

        let (date_from, date_to) = match (date_from, date_to) {
            (Some(from), Some(to)) if from > to => (Some(to), Some(from)),
            pair => pair,
        };

        let lower = |from: Date| {
            Expr::compare(field.clone(), CompareOp::Gte, Expr::Constant(Value::Date(from)))
        };
        let upper = |to: Date| {
            Expr::compare(field.clone(), CompareOp::Lte, Expr::Constant(Value::Date(to)))
        };

        let range = match (date_from, date_to) {
            (Some(from), Some(to)) => lower(from) & upper(to),
            (Some(from), None) => lower(from),
            (None, Some(to)) => upper(to),
            // Both-absent was handled by the no-op guard above.
            (None, None) => return Ok(self),
        };

        let clause = Expr::not_null(field) & range;
        self.combine(clause, condition);

        Ok(self)
    }

    /// Snapshot the accumulated state into an owned predicate.
    ///
    /// A builder with no accumulated criteria yields an always-false
    /// predicate: an unconfigured filter matches nothing rather than
    /// everything. May be called repeatedly; each call returns an
    /// independent predicate reflecting the state at call time.
    #[must_use]
    pub fn build(&self) -> Predicate {
        let body = self
            .body
            .clone()
            .unwrap_or(Expr::Constant(Value::Bool(false)));

        Predicate::new(self.root.clone(), body)
    }

    #[must_use]
    pub const fn root(&self) -> &RootRef {
        &self.root
    }

    fn combine(&mut self, clause: Expr, condition: Condition) {
        self.body = match self.body.take() {
            None => Some(clause),
            Some(body) => match condition {
                Condition::And => Some(body & clause),
                Condition::Or => Some(body | clause),
                Condition::None => Some(body),
            },
        };
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{person, registry};
    use proptest::prelude::*;

    fn builder<'a>(registry: &'a SchemaRegistry) -> PredicateBuilder<'a> {
        PredicateBuilder::new(registry, "Person").unwrap()
    }

    #[test]
    fn unknown_root_type_is_rejected_at_construction() {
        let registry = registry();
        let err = PredicateBuilder::new(&registry, "Ghost").unwrap_err();
        assert!(matches!(
            err,
            BuildError::Resolve(ResolveError::UnknownType { name }) if name == "Ghost"
        ));
    }

    #[test]
    fn unconfigured_builder_matches_nothing() {
        let registry = registry();
        let predicate = builder(&registry).build();

        assert!(!predicate.matches(&person(Some("Anna"), None)));
        assert!(!predicate.matches(&Value::Null));
    }

    #[test]
    fn empty_term_is_a_noop() {
        let registry = registry();
        let mut b = builder(&registry);
        let before = b.build();

        b.add_search("", Condition::And, &["name"]).unwrap();
        assert_eq!(b.build(), before);
    }

    #[test]
    fn search_scenario_matches_substring_and_fails_null() {
        let registry = registry();
        let mut b = builder(&registry);
        b.add_search("ann", Condition::And, &["name"]).unwrap();
        let predicate = b.build();

        assert!(predicate.matches(&person(Some("Anna"), None)));
        assert!(!predicate.matches(&person(Some("Bob"), None)));
        assert!(!predicate.matches(&person(None, None)));
    }

    #[test]
    fn search_on_non_text_field_is_an_error() {
        let registry = registry();
        let mut b = builder(&registry);
        let err = b.add_search("1", Condition::And, &["id"]).unwrap_err();

        assert_eq!(
            err,
            BuildError::TextFieldExpected {
                path: "id".to_string(),
                kind: "int".to_string(),
            }
        );
        // Failed call left the accumulated state untouched.
        assert!(!b.build().matches(&person(Some("Anna"), None)));
    }

    #[test]
    fn unknown_field_aborts_without_partial_mutation() {
        let registry = registry();
        let mut b = builder(&registry);
        b.add_search("ann", Condition::And, &["name"]).unwrap();
        let before = b.build();

        let err = b.add_search("x", Condition::And, &["ghost"]).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Resolve(ResolveError::UnknownField { type_name, field })
                if type_name == "Person" && field == "ghost"
        ));
        assert_eq!(b.build(), before);
    }

    #[test]
    fn or_matches_either_and_requires_both() {
        let registry = registry();

        let mut either = builder(&registry);
        either.add_search("ann", Condition::And, &["name"]).unwrap();
        either.add_search("bob", Condition::Or, &["name"]).unwrap();
        let either = either.build();

        assert!(either.matches(&person(Some("Anna"), None)));
        assert!(either.matches(&person(Some("Bob"), None)));
        assert!(!either.matches(&person(Some("Carol"), None)));

        let mut both = builder(&registry);
        both.add_search("an", Condition::And, &["name"]).unwrap();
        both.add_search("na", Condition::And, &["name"]).unwrap();
        let both = both.build();

        assert!(both.matches(&person(Some("Anna"), None)));
        assert!(!both.matches(&person(Some("Andrew"), None)));
    }

    #[test]
    fn condition_none_drops_the_new_clause() {
        let registry = registry();
        let mut b = builder(&registry);
        b.add_search("ann", Condition::And, &["name"]).unwrap();
        let before = b.build();

        b.add_search("bob", Condition::None, &["name"]).unwrap();
        assert_eq!(b.build(), before);
    }

    #[test]
    fn condition_none_still_seeds_an_empty_body() {
        let registry = registry();
        let mut b = builder(&registry);
        b.add_search("ann", Condition::None, &["name"]).unwrap();

        assert!(b.build().matches(&person(Some("Anna"), None)));
    }

    #[test]
    fn date_scenario_bounds_are_inclusive() {
        let registry = registry();
        let from = Date::new_checked(2024, 1, 1);
        let to = Date::new_checked(2024, 1, 31);

        let mut b = builder(&registry);
        b.add_date(from, to, Condition::And, &["joined"]).unwrap();
        let predicate = b.build();

        assert!(predicate.matches(&person(None, Date::new_checked(2024, 1, 15))));
        assert!(predicate.matches(&person(None, from)));
        assert!(predicate.matches(&person(None, to)));
        assert!(!predicate.matches(&person(None, Date::new_checked(2024, 2, 1))));
        assert!(!predicate.matches(&person(None, None)));
    }

    #[test]
    fn single_sided_date_bounds_work_alone() {
        let registry = registry();
        let from = Date::new_checked(2024, 1, 1);

        let mut b = builder(&registry);
        b.add_date(from, None, Condition::And, &["joined"]).unwrap();
        let predicate = b.build();

        assert!(predicate.matches(&person(None, Date::new_checked(2030, 6, 1))));
        assert!(!predicate.matches(&person(None, Date::new_checked(2020, 6, 1))));
    }

    #[test]
    fn absent_and_sentinel_bounds_are_noops() {
        let registry = registry();
        let mut b = builder(&registry);
        let before = b.build();

        b.add_date(None, None, Condition::And, &["joined"]).unwrap();
        b.add_date(Some(Date::MIN), Some(Date::MIN), Condition::And, &["joined"])
            .unwrap();
        assert_eq!(b.build(), before);

        // A single sentinel bound is NOT the unset convention; it builds.
        b.add_date(Some(Date::MIN), Date::new_checked(2024, 1, 1), Condition::And, &["joined"])
            .unwrap();
        assert_ne!(b.build(), before);
    }

    #[test]
    fn date_on_non_date_field_is_silently_skipped() {
        let registry = registry();
        let mut b = builder(&registry);
        let before = b.build();

        b.add_date(
            Date::new_checked(2024, 1, 1),
            Date::new_checked(2024, 1, 31),
            Condition::And,
            &["name"],
        )
        .unwrap();
        assert_eq!(b.build(), before);
    }

    #[test]
    fn builder_keeps_accumulating_after_build() {
        let registry = registry();
        let mut b = builder(&registry);
        b.add_search("ann", Condition::And, &["name"]).unwrap();
        let first = b.build();

        b.add_search("na", Condition::And, &["name"]).unwrap();
        let second = b.build();

        assert!(first.matches(&person(Some("Annika"), None)));
        assert_ne!(first, second);
        assert!(second.matches(&person(Some("Anna"), None)));
        assert!(!second.matches(&person(Some("Annika"), None)));
    }

    #[test]
    fn nested_path_search_reaches_record_fields() {
        let registry = registry();
        let mut b = builder(&registry);
        b.add_search("dm", Condition::And, &["personal", "first_name"])
            .unwrap();
        let predicate = b.build();

        let row = Value::record([(
            "personal",
            Value::record([("first_name", Value::from("Dmitry"))]),
        )]);
        assert!(predicate.matches(&row));
        assert!(!predicate.matches(&person(Some("Anna"), None)));
    }

    proptest! {
        /// Reversed bounds build the same predicate as ordered bounds.
        #[test]
        fn date_bounds_normalize_order(a in -20_000i32..20_000, b in -20_000i32..20_000) {
            let registry = registry();
            let (from, to) = (Date::from_days(a), Date::from_days(b));

            let mut ordered = builder(&registry);
            ordered
                .add_date(Some(from), Some(to), Condition::And, &["joined"])
                .unwrap();

            let mut reversed = builder(&registry);
            reversed
                .add_date(Some(to), Some(from), Condition::And, &["joined"])
                .unwrap();

            prop_assert_eq!(ordered.build(), reversed.build());
        }

        /// Empty search terms never change the produced predicate.
        #[test]
        fn empty_term_noop_holds_after_any_prior_state(prior in "[a-z]{0,8}") {
            let registry = registry();
            let mut b = builder(&registry);
            if !prior.is_empty() {
                b.add_search(&prior, Condition::And, &["name"]).unwrap();
            }
            let before = b.build();

            b.add_search("", Condition::Or, &["name"]).unwrap();
            prop_assert_eq!(b.build(), before);
        }
    }
}
