use std::fmt;

use chrono::NaiveDate;

use super::error::ConfigError;
use super::value::Metadata;

/// The metadata keys a rule declaration or preset may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Time,
    Account,
    Filter,
    AddTags,
    AddMeta,
    SetPayee,
    SetNarration,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Time,
        FieldKey::Account,
        FieldKey::Filter,
        FieldKey::AddTags,
        FieldKey::AddMeta,
        FieldKey::SetPayee,
        FieldKey::SetNarration,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Time => "time",
            FieldKey::Account => "account",
            FieldKey::Filter => "filter",
            FieldKey::AddTags => "addTags",
            FieldKey::AddMeta => "addMeta",
            FieldKey::SetPayee => "setPayee",
            FieldKey::SetNarration => "setNarration",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recognized fields of one declaration, each optional.
///
/// A field holding an empty string is still *present*: it overrides a preset
/// value during [`overlay`](Self::overlay) but [`configured`](Self::configured)
/// treats it as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFields {
    pub time: Option<String>,
    pub account: Option<String>,
    pub filter: Option<String>,
    pub add_tags: Option<String>,
    pub add_meta: Option<String>,
    pub set_payee: Option<String>,
    pub set_narration: Option<String>,
}

impl RuleFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every recognized key out of a declaration's metadata. Other keys
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] if a recognized key holds a
    /// non-string value.
    pub fn from_meta(meta: &Metadata, date: NaiveDate) -> Result<Self, ConfigError> {
        let mut fields = Self::new();
        for key in FieldKey::ALL {
            let Some(value) = meta.get(key.as_str()) else {
                continue;
            };
            let text = value.as_str().ok_or_else(|| ConfigError::InvalidField {
                key: key.as_str().to_owned(),
                date: date.to_string(),
                value: value.to_string(),
            })?;
            *fields.slot_mut(key) = Some(text.to_owned());
        }
        Ok(fields)
    }

    #[must_use]
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        *self.slot_mut(key) = Some(value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        match key {
            FieldKey::Time => self.time.as_deref(),
            FieldKey::Account => self.account.as_deref(),
            FieldKey::Filter => self.filter.as_deref(),
            FieldKey::AddTags => self.add_tags.as_deref(),
            FieldKey::AddMeta => self.add_meta.as_deref(),
            FieldKey::SetPayee => self.set_payee.as_deref(),
            FieldKey::SetNarration => self.set_narration.as_deref(),
        }
    }

    /// The value of `key` if present and non-empty.
    #[must_use]
    pub fn configured(&self, key: FieldKey) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Per-field merge: every field present on `top` replaces the value here.
    #[must_use]
    pub fn overlay(mut self, top: &RuleFields) -> Self {
        for key in FieldKey::ALL {
            if let Some(value) = top.get(key) {
                *self.slot_mut(key) = Some(value.to_owned());
            }
        }
        self
    }

    fn slot_mut(&mut self, key: FieldKey) -> &mut Option<String> {
        match key {
            FieldKey::Time => &mut self.time,
            FieldKey::Account => &mut self.account,
            FieldKey::Filter => &mut self.filter,
            FieldKey::AddTags => &mut self.add_tags,
            FieldKey::AddMeta => &mut self.add_meta,
            FieldKey::SetPayee => &mut self.set_payee,
            FieldKey::SetNarration => &mut self.set_narration,
        }
    }
}
