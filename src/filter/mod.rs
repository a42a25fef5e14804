//! Transaction predicates consumed by the rule engine.
//!
//! The engine only sees the [`Predicate`] and [`FilterFactory`] traits. A host
//! that already has its own filter implementation plugs it in through the
//! factory; [`StandardFilters`] is the built-in one.

mod account;
mod error;
mod expr;
mod grammar;
mod time;

use std::fmt;

pub use account::AccountPattern;
pub use error::PredicateError;
pub use expr::{CompareOp, FilterExpr, FilterField, FilterExpression};
pub use time::TimeRange;

use crate::Transaction;

/// A compiled filter that accepts or rejects a transaction.
pub trait Predicate: fmt::Debug + Send + Sync {
    fn matches(&self, txn: &Transaction) -> bool;
}

/// Constructors for the three filter kinds a rule can declare.
pub trait FilterFactory {
    /// Build a filter for a `time` field such as `2025-Q1` or `2024 - 2025`.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError`] if the period cannot be understood.
    fn time_range(&self, spec: &str) -> Result<Box<dyn Predicate>, PredicateError>;

    /// Build a filter for an `account` field.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError`] if the pattern is invalid.
    fn account_pattern(&self, pattern: &str) -> Result<Box<dyn Predicate>, PredicateError>;

    /// Build a filter for a `filter` field.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError`] if the expression does not parse.
    fn boolean_expression(&self, expr: &str) -> Result<Box<dyn Predicate>, PredicateError>;
}

/// The built-in filter implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFilters;

impl FilterFactory for StandardFilters {
    fn time_range(&self, spec: &str) -> Result<Box<dyn Predicate>, PredicateError> {
        Ok(Box::new(TimeRange::parse(spec)?))
    }

    fn account_pattern(&self, pattern: &str) -> Result<Box<dyn Predicate>, PredicateError> {
        Ok(Box::new(AccountPattern::new(pattern)?))
    }

    fn boolean_expression(&self, expr: &str) -> Result<Box<dyn Predicate>, PredicateError> {
        Ok(Box::new(FilterExpression::parse(expr)?))
    }
}

/// Adapts a closure into a [`Predicate`].
pub struct FnPredicate<F> {
    name: String,
    f: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&Transaction) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Transaction) -> bool + Send + Sync,
{
    fn matches(&self, txn: &Transaction) -> bool {
        (self.f)(txn)
    }
}
