use super::directive::{Custom, Transaction};
use super::fields::{FieldKey, RuleFields};
use super::value::Metadata;
use crate::filter::Predicate;
use crate::literal::LiteralError;

/// A rule compiled from one `apply` declaration.
///
/// Produced by [`RuleSet::compile`](super::RuleSet::compile). Predicates,
/// tag values and the `addMeta` literal are prepared once here so applying
/// the rule to a transaction does no parsing.
#[derive(Debug)]
pub struct Rule {
    pub(crate) source: Custom,
    pub(crate) fields: RuleFields,
    pub(crate) filters: Vec<Box<dyn Predicate>>,
    pub(crate) tag_values: Vec<String>,
    /// Parsed `addMeta`; a malformed literal is kept and reported per
    /// matching transaction.
    pub(crate) meta_values: Option<Result<Metadata, LiteralError>>,
    pub(crate) match_count: usize,
}

impl Rule {
    /// The declaration this rule was compiled from.
    #[must_use]
    pub fn source(&self) -> &Custom {
        &self.source
    }

    /// Effective fields after merging the referenced preset.
    #[must_use]
    pub fn fields(&self) -> &RuleFields {
        &self.fields
    }

    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn tag_values(&self) -> &[String] {
        &self.tag_values
    }

    /// How many transactions this rule matched in the last run.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// A rule without filters matches every transaction.
    #[must_use]
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.filters.iter().all(|f| f.matches(txn))
    }

    pub(crate) fn action(&self, key: FieldKey) -> Option<&str> {
        self.fields.configured(key)
    }
}
