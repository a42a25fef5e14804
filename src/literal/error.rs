use std::fmt;

/// Errors produced when parsing a mapping literal such as
/// `{'invoice': 'F/1', 'paid': True}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    message: String,
}

impl LiteralError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed mapping literal: {}", self.message)
    }
}

impl std::error::Error for LiteralError {}
