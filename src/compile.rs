use indexmap::IndexMap;

use crate::filter::{FilterFactory, Predicate};
use crate::literal::parse_mapping;
use crate::types::{
    ConfigError, Custom, DeclarationKind, Directive, FieldKey, Rule, RuleFields, RuleSet,
};
use crate::Error;

/// Metadata key naming a preset.
pub const NAME_KEY: &str = "name";
/// Metadata key on an `apply` declaration referencing a preset.
pub const PRESET_KEY: &str = "preset";

pub(crate) fn compile<F>(directives: &[Directive], factory: &F) -> Result<RuleSet, Error>
where
    F: FilterFactory + ?Sized,
{
    let presets = collect_presets(directives)?;

    let mut rules = Vec::new();
    for source in declarations(directives, DeclarationKind::Apply) {
        let direct = RuleFields::from_meta(&source.meta, source.date)?;
        let base = match source.meta.get(PRESET_KEY) {
            Some(reference) => {
                let name = reference.text();
                presets
                    .get(&*name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownPreset {
                        preset: name.into_owned(),
                        date: source.date.to_string(),
                    })?
            }
            None => RuleFields::new(),
        };
        let fields = base.overlay(&direct);
        rules.push(build_rule(source.clone(), fields, factory)?);
    }

    tracing::debug!(
        presets = presets.len(),
        rules = rules.len(),
        "compiled filter-map rules"
    );
    Ok(RuleSet { presets, rules })
}

fn declarations(
    directives: &[Directive],
    kind: DeclarationKind,
) -> impl Iterator<Item = &Custom> {
    directives
        .iter()
        .filter_map(Directive::as_custom)
        .filter(move |c| c.declaration_kind() == Some(kind))
}

fn collect_presets(directives: &[Directive]) -> Result<IndexMap<String, RuleFields>, ConfigError> {
    let mut presets = IndexMap::new();
    for source in declarations(directives, DeclarationKind::Preset) {
        let name = source
            .meta
            .get(NAME_KEY)
            .map(|v| v.text().into_owned())
            .ok_or_else(|| ConfigError::UnnamedPreset {
                date: source.date.to_string(),
            })?;
        let fields = RuleFields::from_meta(&source.meta, source.date)?;
        if presets.insert(name.clone(), fields).is_some() {
            tracing::warn!(preset = %name, date = %source.date, "duplicate preset, last one wins");
        }
    }
    Ok(presets)
}

fn build_rule<F>(source: Custom, fields: RuleFields, factory: &F) -> Result<Rule, Error>
where
    F: FilterFactory + ?Sized,
{
    let mut filters: Vec<Box<dyn Predicate>> = Vec::new();
    if let Some(spec) = fields.configured(FieldKey::Time) {
        filters.push(factory.time_range(spec)?);
    }
    if let Some(pattern) = fields.configured(FieldKey::Account) {
        filters.push(factory.account_pattern(pattern)?);
    }
    if let Some(expr) = fields.configured(FieldKey::Filter) {
        filters.push(factory.boolean_expression(expr)?);
    }

    let tag_values = fields
        .configured(FieldKey::AddTags)
        .map(split_tags)
        .unwrap_or_default();
    let meta_values = fields.configured(FieldKey::AddMeta).map(parse_mapping);
    if let Some(Err(e)) = &meta_values {
        tracing::warn!(date = %source.date, error = %e, "addMeta will not be applied");
    }

    Ok(Rule {
        source,
        fields,
        filters,
        tag_values,
        meta_values,
        match_count: 0,
    })
}

/// `"#a  #b c"` -> `["a", "b", "c"]`.
pub(crate) fn split_tags(spec: &str) -> Vec<String> {
    spec.split_whitespace()
        .map(|t| t.trim_start_matches('#'))
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}
