mod amount;
mod diagnostic;
mod directive;
mod error;
mod fields;
mod output;
mod rule;
mod ruleset;
mod value;

pub use amount::{round_half_up, Amount, Cost};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub(crate) use directive::account_is_under;
pub use directive::{
    Custom, DeclarationKind, Directive, OtherDirective, Posting, Transaction, FILTER_MAP_TYPE,
};
pub use error::ConfigError;
pub use fields::{FieldKey, RuleFields};
pub use output::Output;
pub use rule::Rule;
pub use ruleset::RuleSet;
pub use value::{MetaValue, Metadata};
