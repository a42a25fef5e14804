use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::amount::Amount;

/// Insertion-ordered metadata attached to directives and postings.
pub type Metadata = IndexMap<String, MetaValue>;

/// Supported metadata value types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaValue {
    /// A UTF-8 string.
    String(String),
    /// A decimal number. Integers are stored here too.
    Number(Decimal),
    /// A boolean value.
    Bool(bool),
    /// A calendar date.
    Date(NaiveDate),
    /// A number with a currency.
    Amount(Amount),
    /// An explicit null.
    None,
}

impl MetaValue {
    /// The string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Unquoted text form used by filters. Strings are returned as-is, every
    /// other variant through its `Display` rendering.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            MetaValue::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::String(v.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::String(v)
    }
}

impl From<Decimal> for MetaValue {
    fn from(v: Decimal) -> Self {
        MetaValue::Number(v)
    }
}

impl From<usize> for MetaValue {
    fn from(v: usize) -> Self {
        MetaValue::Number(Decimal::from(v))
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<NaiveDate> for MetaValue {
    fn from(v: NaiveDate) -> Self {
        MetaValue::Date(v)
    }
}

impl From<Amount> for MetaValue {
    fn from(v: Amount) -> Self {
        MetaValue::Amount(v)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::String(v) => write!(f, "\"{v}\""),
            MetaValue::Number(v) => write!(f, "{v}"),
            MetaValue::Bool(true) => write!(f, "TRUE"),
            MetaValue::Bool(false) => write!(f, "FALSE"),
            MetaValue::Date(v) => write!(f, "{v}"),
            MetaValue::Amount(v) => write!(f, "{v}"),
            MetaValue::None => write!(f, "NULL"),
        }
    }
}
