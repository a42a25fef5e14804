use regex::{Regex, RegexBuilder};

use super::{Predicate, PredicateError};
use crate::types::account_is_under;
use crate::Transaction;

/// Matches transactions with at least one posting on a matching account.
///
/// An account matches when it equals the pattern, lives below it, or is
/// found by the pattern used as a case-insensitive regular expression.
#[derive(Debug, Clone)]
pub struct AccountPattern {
    pattern: String,
    regex: Regex,
}

impl AccountPattern {
    /// # Errors
    ///
    /// Returns [`PredicateError::InvalidAccountPattern`] if the pattern is not
    /// a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, PredicateError> {
        let pattern = pattern.trim();
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| PredicateError::InvalidAccountPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    #[must_use]
    pub fn matches_account(&self, account: &str) -> bool {
        account_is_under(account, &self.pattern) || self.regex.is_match(account)
    }
}

impl Predicate for AccountPattern {
    fn matches(&self, txn: &Transaction) -> bool {
        txn.postings
            .iter()
            .any(|p| self.matches_account(&p.account))
    }
}
