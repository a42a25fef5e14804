//! Rule-driven rewriting of ledger transactions.
//!
//! Two engines work over a stream of [`Directive`]s:
//!
//! - [`filter_map`] compiles the `custom "filter-map"` declarations found in
//!   the stream into [`Rule`]s and applies them to every transaction: adding
//!   tags and metadata and rewriting payee and narration.
//! - [`vat`] splits transactions tagged `#vat` into net amounts and a tax
//!   posting.
//!
//! ```
//! use chrono::NaiveDate;
//! use lazybean::filter::StandardFilters;
//! use lazybean::{Custom, DeclarationKind, Directive, Transaction};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
//! let directives: Vec<Directive> = vec![
//!     Custom::filter_map(day, DeclarationKind::Preset)
//!         .meta("name", "office")
//!         .meta("addTags", "#office")
//!         .into(),
//!     Custom::filter_map(day, DeclarationKind::Apply)
//!         .meta("preset", "office")
//!         .meta("filter", "payee == \"Paper Co\"")
//!         .into(),
//!     Transaction::new(day, "A4 paper").payee("Paper Co").into(),
//! ];
//!
//! let output = lazybean::filter_map(directives, &StandardFilters).unwrap();
//! assert!(output.transactions().all(|t| t.has_tag("office")));
//! ```

mod apply;
mod compile;
mod error;
pub mod filter;
pub mod literal;
mod mutate;
pub mod plugin;
mod report;
mod types;
pub mod vat;

pub use compile::{NAME_KEY, PRESET_KEY};
pub use error::Error;
pub use mutate::{apply_set_action, REPLACE_PREFIX};
pub use report::TIMES_APPLIED_KEY;
pub use types::{
    round_half_up, Amount, ConfigError, Cost, Custom, DeclarationKind, Diagnostic,
    DiagnosticKind, Directive, FieldKey, MetaValue, Metadata, OtherDirective, Output, Posting,
    Rule, RuleFields, RuleSet, Transaction, FILTER_MAP_TYPE,
};
pub use vat::VatConfig;

use filter::FilterFactory;

/// Compile the `filter-map` declarations of `directives` and apply them.
///
/// The output starts with every `apply` declaration, annotated with its
/// match count, followed by the rewritten stream.
///
/// # Errors
///
/// Returns [`Error`] for an invalid rule configuration. No output is
/// produced in that case.
pub fn filter_map<F>(directives: Vec<Directive>, factory: &F) -> Result<Output, Error>
where
    F: FilterFactory + ?Sized,
{
    let mut rules = RuleSet::compile(&directives, factory)?;
    Ok(rules.apply(directives))
}

/// Split every transaction carrying the configured marker tag.
pub fn vat(directives: Vec<Directive>, config: &VatConfig) -> Output {
    vat::run(directives, config)
}
