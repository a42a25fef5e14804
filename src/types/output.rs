use std::fmt;

use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::directive::{Directive, Transaction};

/// The rewritten stream of a run plus the diagnostics it raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Output {
    pub directives: Vec<Directive>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Output {
    pub fn new(directives: Vec<Directive>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            directives,
            diagnostics,
        }
    }

    /// The transactions of the output stream, in order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.directives.iter().filter_map(Directive::as_transaction)
    }

    /// Diagnostics of one kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind() == kind)
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Directive>, Vec<Diagnostic>) {
        (self.directives, self.diagnostics)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directives, {} diagnostics",
            self.directives.len(),
            self.diagnostics.len()
        )
    }
}
