use crate::mutate::{merge_meta, set_narration, set_payee, union_tags};
use crate::types::{
    DeclarationKind, Diagnostic, DiagnosticKind, Directive, FieldKey, Rule, Transaction,
};

pub(crate) fn apply(
    rules: &mut [Rule],
    directives: Vec<Directive>,
) -> (Vec<Directive>, Vec<Diagnostic>) {
    let mut out = Vec::with_capacity(directives.len());
    let mut diagnostics = Vec::new();

    for directive in directives {
        match directive {
            Directive::Custom(c) if c.declaration_kind() == Some(DeclarationKind::Apply) => {}
            Directive::Transaction(txn) => {
                let txn = apply_rules(rules, txn, &mut diagnostics);
                out.push(Directive::Transaction(txn));
            }
            other => out.push(other),
        }
    }

    tracing::debug!(
        directives = out.len(),
        diagnostics = diagnostics.len(),
        "applied filter-map rules"
    );
    (out, diagnostics)
}

/// Run every rule over one transaction, each seeing the previous rules'
/// rewrites.
fn apply_rules(
    rules: &mut [Rule],
    mut txn: Transaction,
    diagnostics: &mut Vec<Diagnostic>,
) -> Transaction {
    for rule in rules.iter_mut() {
        if !rule.matches(&txn) {
            continue;
        }
        rule.match_count += 1;
        tracing::trace!(date = %txn.date, rule = %rule.source.date, "rule matched");

        if !rule.tag_values.is_empty() {
            txn = union_tags(txn, &rule.tag_values);
        }
        match &rule.meta_values {
            Some(Ok(meta)) => txn = merge_meta(txn, meta),
            Some(Err(e)) => {
                tracing::warn!(date = %txn.date, error = %e, "skipping remaining rules");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedMetadata,
                    txn.date,
                    format!("addMeta of rule declared on {}: {e}", rule.source.date),
                ));
                return txn;
            }
            None => {}
        }
        if let Some(action) = rule.action(FieldKey::SetPayee) {
            txn = set_payee(txn, action);
        }
        if let Some(action) = rule.action(FieldKey::SetNarration) {
            txn = set_narration(txn, action);
        }
    }
    txn
}
