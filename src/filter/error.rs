use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredicateError {
    #[error("invalid time range '{spec}': {reason}")]
    InvalidTimeRange { spec: String, reason: String },

    #[error("invalid account pattern '{pattern}': {reason}")]
    InvalidAccountPattern { pattern: String, reason: String },

    #[error("invalid filter expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },
}
