use thiserror::Error;

use crate::literal::LiteralError;

/// Fatal configuration problems. A run that hits one of these produces no
/// output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown preset '{preset}' referenced by rule declared on {date}")]
    UnknownPreset { preset: String, date: String },

    #[error("preset declared on {date} has no 'name'")]
    UnnamedPreset { date: String },

    #[error("field '{key}' declared on {date} must be a string, got {value}")]
    InvalidField {
        key: String,
        date: String,
        value: String,
    },

    #[error("invalid tax rate '{value}'")]
    InvalidRate { value: String },

    #[error("config key '{key}' must be a string, got {value}")]
    InvalidConfigValue { key: String, value: String },

    #[error("malformed plugin configuration: {0}")]
    MalformedConfig(#[source] LiteralError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_preset_message() {
        let err = ConfigError::UnknownPreset {
            preset: "office".into(),
            date: "2025-01-01".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown preset 'office' referenced by rule declared on 2025-01-01"
        );
    }

    #[test]
    fn unnamed_preset_message() {
        let err = ConfigError::UnnamedPreset {
            date: "2025-01-01".into(),
        };
        assert_eq!(err.to_string(), "preset declared on 2025-01-01 has no 'name'");
    }

    #[test]
    fn invalid_field_message() {
        let err = ConfigError::InvalidField {
            key: "addTags".into(),
            date: "2025-02-01".into(),
            value: "42".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'addTags' declared on 2025-02-01 must be a string, got 42"
        );
    }

    #[test]
    fn invalid_rate_message() {
        let err = ConfigError::InvalidRate {
            value: "lots".into(),
        };
        assert_eq!(err.to_string(), "invalid tax rate 'lots'");
    }

    #[test]
    fn invalid_config_value_message() {
        let err = ConfigError::InvalidConfigValue {
            key: "input_account".into(),
            value: "TRUE".into(),
        };
        assert_eq!(
            err.to_string(),
            "config key 'input_account' must be a string, got TRUE"
        );
    }

    #[test]
    fn malformed_config_message() {
        let err = ConfigError::MalformedConfig(LiteralError::new("expected '}'"));
        assert_eq!(
            err.to_string(),
            "malformed plugin configuration: malformed mapping literal: expected '}'"
        );
    }
}
