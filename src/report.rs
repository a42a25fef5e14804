use crate::types::{Custom, FieldKey, MetaValue, Rule};

/// Metadata key recording how many transactions a rule matched.
pub const TIMES_APPLIED_KEY: &str = "_timesApplied";

/// A copy of the rule's declaration carrying its match count, with the
/// configured tags and filter appended to its values for display.
pub(crate) fn annotate(rule: &Rule) -> Custom {
    let mut source = rule.source.clone();
    source
        .meta
        .insert(TIMES_APPLIED_KEY.to_owned(), MetaValue::from(rule.match_count));
    for key in [FieldKey::AddTags, FieldKey::Filter] {
        if let Some(value) = rule.action(key) {
            source.values.push(MetaValue::from(value));
        }
    }
    source
}
