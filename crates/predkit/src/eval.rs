use crate::{
    expr::{CompareOp, Expr, LogicOp, Predicate},
    value::{TextMode, Value},
};
use std::cmp::Ordering;

///
/// In-memory predicate evaluation.
///
/// Pure tree walking with no schema access: the tree was typed when it was
/// built, so evaluation only has to be total. Any comparison that is not
/// defined for the values at hand (cross-kind ordering, ordering against
/// null, containment on non-text) evaluates to `false` rather than erroring.
///

impl Predicate {
    /// Evaluate against a row instance, normally a [`Value::Record`] keyed
    /// by the root type's field names.
    #[must_use]
    pub fn matches(&self, instance: &Value) -> bool {
        eval_bool(self.body(), instance)
    }
}

fn eval_bool(expr: &Expr, instance: &Value) -> bool {
    matches!(eval(expr, instance), Value::Bool(true))
}

fn eval(expr: &Expr, instance: &Value) -> Value {
    match expr {
        Expr::Root(_) => instance.clone(),

        // Broken chains (null or missing intermediates) read as Null and
        // get rejected by the builder's not-null guards downstream.
        Expr::Field(access) => eval(&access.target, instance).field(&access.field),

        Expr::Constant(value) => value.clone(),

        Expr::Compare { left, op, right } => {
            let left = eval(left, instance);
            let right = eval(right, instance);
            Value::Bool(eval_compare(&left, *op, &right))
        }

        // Substring search is case-insensitive: `contains` exists for the
        // builder's user-facing search criteria.
        Expr::Contains { haystack, needle } => {
            let haystack = eval(haystack, instance);
            let needle = eval(needle, instance);
            Value::Bool(haystack.text_contains(&needle, TextMode::Ci).unwrap_or(false))
        }

        Expr::Logic { left, op, right } => Value::Bool(match op {
            LogicOp::And => eval_bool(left, instance) && eval_bool(right, instance),
            LogicOp::Or => eval_bool(left, instance) || eval_bool(right, instance),
        }),
    }
}

fn eval_compare(left: &Value, op: CompareOp, right: &Value) -> bool {
    match op {
        // Equality is total; `Null == Null` holds, which is what the
        // not-null guard relies on.
        CompareOp::Eq => left == right,
        CompareOp::Ne => left != right,

        CompareOp::Gte => left.compare_order(right).is_some_and(Ordering::is_ge),
        CompareOp::Lte => left.compare_order(right).is_some_and(Ordering::is_le),
    }
}

///
/// TESTS
///
