use std::fmt;

use indexmap::IndexMap;

use super::directive::{Custom, Directive};
use super::fields::RuleFields;
use super::output::Output;
use super::rule::Rule;
use crate::filter::FilterFactory;
use crate::Error;

/// The compiled `filter-map` rules of one ledger.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use lazybean::filter::StandardFilters;
/// use lazybean::{Custom, DeclarationKind, Directive, RuleSet, Transaction};
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
/// let directives: Vec<Directive> = vec![
///     Custom::filter_map(day, DeclarationKind::Apply)
///         .meta("filter", "payee == \"Cafe\"")
///         .meta("addTags", "#coffee")
///         .into(),
///     Transaction::new(day, "espresso").payee("Cafe").into(),
/// ];
///
/// let mut rules = RuleSet::compile(&directives, &StandardFilters).unwrap();
/// let output = rules.apply(directives);
/// assert_eq!(rules.match_counts(), [1]);
/// assert!(output.transactions().all(|t| t.has_tag("coffee")));
/// ```
#[derive(Debug)]
pub struct RuleSet {
    pub(crate) presets: IndexMap<String, RuleFields>,
    pub(crate) rules: Vec<Rule>,
}

impl RuleSet {
    /// Collect every preset, then compile every `apply` declaration of
    /// `directives` in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown or unnamed preset or a
    /// non-string field, and [`Error::Predicate`] when the factory rejects a
    /// filter.
    pub fn compile<F>(directives: &[Directive], factory: &F) -> Result<Self, Error>
    where
        F: FilterFactory + ?Sized,
    {
        crate::compile::compile(directives, factory)
    }

    /// Rewrite `directives` with these rules.
    ///
    /// Match counters restart from zero on every call. The returned stream
    /// starts with the annotated `apply` declarations, followed by the input
    /// with those declarations removed and every transaction rewritten.
    pub fn apply(&mut self, directives: Vec<Directive>) -> Output {
        for rule in &mut self.rules {
            rule.match_count = 0;
        }
        let (rewritten, diagnostics) = crate::apply::apply(&mut self.rules, directives);
        let mut stream: Vec<Directive> = self
            .annotated_declarations()
            .into_iter()
            .map(Directive::Custom)
            .collect();
        stream.extend(rewritten);
        Output::new(stream, diagnostics)
    }

    /// The source declaration of every rule, carrying its match count from
    /// the last [`apply`](Self::apply).
    #[must_use]
    pub fn annotated_declarations(&self) -> Vec<Custom> {
        self.rules.iter().map(crate::report::annotate).collect()
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Match counts from the last run, in declaration order.
    #[must_use]
    pub fn match_counts(&self) -> Vec<usize> {
        self.rules.iter().map(Rule::match_count).collect()
    }

    /// The fields of a named preset.
    #[must_use]
    pub fn preset(&self, name: &str) -> Option<&RuleFields> {
        self.presets.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSet({} rules, {} presets)",
            self.rules.len(),
            self.presets.len(),
        )
    }
}
