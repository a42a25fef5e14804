use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::amount::{Amount, Cost};
use super::value::{MetaValue, Metadata};

/// The `Custom` type name under which rule declarations are written.
pub const FILTER_MAP_TYPE: &str = "filter-map";

/// One entry of the ledger stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Directive {
    Transaction(Transaction),
    Custom(Custom),
    /// Any other directive kind (`open`, `balance`, `price`, ...). Never
    /// inspected by the engines.
    Other(OtherDirective),
}

impl Directive {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Directive::Transaction(t) => t.date,
            Directive::Custom(c) => c.date,
            Directive::Other(o) => o.date,
        }
    }

    #[must_use]
    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Directive::Transaction(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_custom(&self) -> Option<&Custom> {
        match self {
            Directive::Custom(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Transaction> for Directive {
    fn from(t: Transaction) -> Self {
        Directive::Transaction(t)
    }
}

impl From<Custom> for Directive {
    fn from(c: Custom) -> Self {
        Directive::Custom(c)
    }
}

impl From<OtherDirective> for Directive {
    fn from(o: OtherDirective) -> Self {
        Directive::Other(o)
    }
}

/// A dated transaction with its postings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub date: NaiveDate,
    pub flag: char,
    pub payee: Option<String>,
    pub narration: Option<String>,
    pub tags: BTreeSet<String>,
    pub links: BTreeSet<String>,
    pub meta: Metadata,
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// A completed (`*`) transaction with no payee, tags or postings.
    #[must_use]
    pub fn new(date: NaiveDate, narration: impl Into<String>) -> Self {
        Self {
            date,
            flag: '*',
            payee: None,
            narration: Some(narration.into()),
            tags: BTreeSet::new(),
            links: BTreeSet::new(),
            meta: Metadata::new(),
            postings: Vec::new(),
        }
    }

    #[must_use]
    pub fn payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = Some(payee.into());
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: char) -> Self {
        self.flag = flag;
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.links.insert(link.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// One account line of a transaction.
///
/// `units == None` marks an auto-balanced posting whose amount the host
/// interpolates later.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Posting {
    pub account: String,
    pub units: Option<Amount>,
    pub cost: Option<Cost>,
    pub price: Option<Amount>,
    pub flag: Option<char>,
    pub meta: Metadata,
}

impl Posting {
    #[must_use]
    pub fn new(account: impl Into<String>, units: Amount) -> Self {
        Self {
            account: account.into(),
            units: Some(units),
            cost: None,
            price: None,
            flag: None,
            meta: Metadata::new(),
        }
    }

    /// A posting without units, balanced by the host.
    #[must_use]
    pub fn auto(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            units: None,
            cost: None,
            price: None,
            flag: None,
            meta: Metadata::new(),
        }
    }

    /// Whether the account is `prefix` itself or lives below it.
    #[must_use]
    pub fn is_under(&self, prefix: &str) -> bool {
        account_is_under(&self.account, prefix)
    }
}

pub(crate) fn account_is_under(account: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches(':');
    account == prefix
        || account
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// A `custom` directive: a type name, positional values and metadata.
///
/// Rule declarations are `custom "filter-map" "preset"` and
/// `custom "filter-map" "apply"` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Custom {
    pub date: NaiveDate,
    pub type_name: String,
    pub values: Vec<MetaValue>,
    pub meta: Metadata,
}

/// The two kinds of rule declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Preset,
    Apply,
}

impl Custom {
    #[must_use]
    pub fn new(date: NaiveDate, type_name: impl Into<String>) -> Self {
        Self {
            date,
            type_name: type_name.into(),
            values: Vec::new(),
            meta: Metadata::new(),
        }
    }

    /// A `filter-map` declaration of the given kind.
    #[must_use]
    pub fn filter_map(date: NaiveDate, kind: DeclarationKind) -> Self {
        let value = match kind {
            DeclarationKind::Preset => "preset",
            DeclarationKind::Apply => "apply",
        };
        Self::new(date, FILTER_MAP_TYPE).value(value)
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<MetaValue>) -> Self {
        self.values.push(value.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Classify this directive as a rule declaration, if it is one.
    #[must_use]
    pub fn declaration_kind(&self) -> Option<DeclarationKind> {
        if self.type_name != FILTER_MAP_TYPE {
            return None;
        }
        match self.values.first()?.as_str()?.trim() {
            "preset" => Some(DeclarationKind::Preset),
            "apply" => Some(DeclarationKind::Apply),
            _ => None,
        }
    }
}

/// Opaque pass-through directive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OtherDirective {
    pub date: NaiveDate,
    pub kind: String,
    pub meta: Metadata,
    pub body: String,
}
