use std::fmt;

use chrono::NaiveDate;

/// Kinds of non-fatal problems found while rewriting a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A matching rule's `addMeta` literal could not be parsed; the
    /// transaction's remaining mutations were skipped.
    MalformedMetadata,
    /// A `vat` transaction had taxable postings in more than one currency
    /// and was left unsplit.
    MixedCurrencies,
    /// A `vat` transaction's amounts were too large to split exactly and it
    /// was left unsplit.
    Overflow,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedMetadata => write!(f, "malformed metadata"),
            DiagnosticKind::MixedCurrencies => write!(f, "mixed currencies"),
            DiagnosticKind::Overflow => write!(f, "amount overflow"),
        }
    }
}

/// A non-fatal problem attached to the transaction it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Diagnostic {
    kind: DiagnosticKind,
    date: NaiveDate,
    message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.date, self.kind, self.message)
    }
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            kind,
            date,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
