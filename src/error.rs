use thiserror::Error;

use crate::filter::PredicateError;
use crate::ConfigError;

/// Unified error type for a run.
///
/// Returned by [`filter_map()`](crate::filter_map) and
/// [`RuleSet::compile()`](crate::RuleSet::compile).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Predicate(#[from] PredicateError),
}
