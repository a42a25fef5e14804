use crate::literal::parse_string_pairs;
use crate::{Metadata, Transaction};

/// Prefix that turns a set action into a list of substring substitutions.
pub const REPLACE_PREFIX: &str = "replace:";

/// Rewrite a payee or narration value.
///
/// A plain `action` replaces `current` entirely. An action of the form
/// `replace:{'old': 'new', ...}` applies each substitution to `current` in
/// the order written. If the mapping after the prefix is malformed, or has a
/// non-string value, the whole action string (prefix included) becomes the
/// new value.
///
/// ```
/// use lazybean::apply_set_action;
///
/// assert_eq!(apply_set_action("Shop", "old"), "Shop");
/// assert_eq!(
///     apply_set_action("replace:{'Sp. z o.o.': ''}", "ACME Sp. z o.o."),
///     "ACME "
/// );
/// ```
#[must_use]
pub fn apply_set_action(action: &str, current: &str) -> String {
    let Some(spec) = action.strip_prefix(REPLACE_PREFIX) else {
        return action.to_owned();
    };
    match parse_string_pairs(spec.trim()) {
        Ok(pairs) => pairs
            .iter()
            .fold(current.to_owned(), |acc, (old, new)| acc.replace(old, new)),
        Err(e) => {
            tracing::trace!(error = %e, "replace spec not usable, replacing whole value");
            action.to_owned()
        }
    }
}

pub(crate) fn union_tags(txn: Transaction, tags: &[String]) -> Transaction {
    let mut merged = txn.tags;
    merged.extend(tags.iter().cloned());
    Transaction {
        tags: merged,
        ..txn
    }
}

pub(crate) fn merge_meta(txn: Transaction, extra: &Metadata) -> Transaction {
    let mut merged = txn.meta;
    for (key, value) in extra {
        merged.insert(key.clone(), value.clone());
    }
    Transaction { meta: merged, ..txn }
}

pub(crate) fn set_payee(txn: Transaction, action: &str) -> Transaction {
    let payee = apply_set_action(action, txn.payee.as_deref().unwrap_or(""));
    Transaction {
        payee: Some(payee),
        ..txn
    }
}

pub(crate) fn set_narration(txn: Transaction, action: &str) -> Transaction {
    let narration = apply_set_action(action, txn.narration.as_deref().unwrap_or(""));
    Transaction {
        narration: Some(narration),
        ..txn
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::MetaValue;

    fn txn() -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(), "Lunch at Roma")
            .payee("Pizzeria Roma")
            .tag("food")
            .meta("invoice", "F/1")
    }

    #[test]
    fn plain_action_replaces_value() {
        assert_eq!(apply_set_action("Cafe", "Pizzeria"), "Cafe");
        assert_eq!(apply_set_action("", "Pizzeria"), "");
    }

    #[test]
    fn replace_applies_substitutions() {
        assert_eq!(
            apply_set_action("replace:{'Roma': 'Napoli'}", "Pizzeria Roma"),
            "Pizzeria Napoli"
        );
    }

    #[test]
    fn replace_runs_in_declaration_order() {
        // "a" -> "b" first, then every "b" -> "c"
        assert_eq!(apply_set_action("replace:{'a': 'b', 'b': 'c'}", "ab"), "cc");
        assert_eq!(apply_set_action("replace:{'b': 'c', 'a': 'b'}", "ab"), "bc");
    }

    #[test]
    fn replace_on_empty_current_value() {
        assert_eq!(apply_set_action("replace:{'x': 'y'}", ""), "");
    }

    #[test]
    fn malformed_replace_falls_back_to_whole_value() {
        let action = "replace:{'unterminated: 'x'}";
        assert_eq!(apply_set_action(action, "anything"), action);
        let action = "replace:not a mapping";
        assert_eq!(apply_set_action(action, "anything"), action);
    }

    #[test]
    fn non_string_replacement_falls_back() {
        let action = "replace:{'a': 1}";
        assert_eq!(apply_set_action(action, "abc"), action);
    }

    #[test]
    fn prefix_is_case_sensitive() {
        assert_eq!(apply_set_action("Replace:{'a': 'b'}", "a"), "Replace:{'a': 'b'}");
    }

    #[test]
    fn union_tags_collapses_duplicates() {
        let out = union_tags(txn(), &["food".into(), "team".into()]);
        let tags: Vec<&str> = out.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, ["food", "team"]);
    }

    #[test]
    fn merge_meta_overwrites_and_appends() {
        let mut extra = Metadata::new();
        extra.insert("invoice".into(), MetaValue::from("F/2"));
        extra.insert("project".into(), MetaValue::from("alpha"));
        let out = merge_meta(txn(), &extra);
        assert_eq!(out.meta["invoice"], MetaValue::from("F/2"));
        assert_eq!(out.meta["project"], MetaValue::from("alpha"));
        let keys: Vec<&str> = out.meta.keys().map(String::as_str).collect();
        assert_eq!(keys, ["invoice", "project"]);
    }

    #[test]
    fn set_payee_and_narration_leave_other_fields() {
        let before = txn();
        let out = set_payee(before.clone(), "replace:{'Pizzeria ': ''}");
        let out = set_narration(out, "Team lunch");
        assert_eq!(out.payee.as_deref(), Some("Roma"));
        assert_eq!(out.narration.as_deref(), Some("Team lunch"));
        assert_eq!(out.tags, before.tags);
        assert_eq!(out.meta, before.meta);
    }

    #[test]
    fn set_payee_on_missing_payee() {
        let t = Transaction::new(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(), "x");
        assert_eq!(set_payee(t, "Shop").payee.as_deref(), Some("Shop"));
    }
}
