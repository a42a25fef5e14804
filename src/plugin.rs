//! Running the engines behind one interface.

use crate::filter::{FilterFactory, StandardFilters};
use crate::types::{ConfigError, Directive, Output};
use crate::vat::VatConfig;
use crate::Error;

/// A transformation over a whole directive stream.
pub trait Plugin: Send + Sync {
    /// Plugin name.
    fn name(&self) -> &'static str;

    /// Rewrite `directives`, returning the new stream and its diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when the plugin's configuration is unusable; no
    /// output is produced then.
    fn process(&self, directives: Vec<Directive>) -> Result<Output, Error>;
}

/// The rule engine driven by `filter-map` declarations in the stream.
#[derive(Debug, Clone, Default)]
pub struct FilterMap<F = StandardFilters> {
    factory: F,
}

impl FilterMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F> FilterMap<F>
where
    F: FilterFactory + Send + Sync,
{
    /// Build filters with a host-provided factory.
    #[must_use]
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> Plugin for FilterMap<F>
where
    F: FilterFactory + Send + Sync,
{
    fn name(&self) -> &'static str {
        "filter_map"
    }

    fn process(&self, directives: Vec<Directive>) -> Result<Output, Error> {
        crate::filter_map(directives, &self.factory)
    }
}

/// The tax split.
#[derive(Debug, Clone, Default)]
pub struct Vat {
    config: VatConfig,
}

impl Vat {
    #[must_use]
    pub fn new(config: VatConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// See [`VatConfig::from_config_str`].
    pub fn from_config_str(config: &str) -> Result<Self, ConfigError> {
        VatConfig::from_config_str(config).map(Self::new)
    }

    #[must_use]
    pub fn config(&self) -> &VatConfig {
        &self.config
    }
}

impl Plugin for Vat {
    fn name(&self) -> &'static str {
        "vat"
    }

    fn process(&self, directives: Vec<Directive>) -> Result<Output, Error> {
        Ok(crate::vat(directives, &self.config))
    }
}

/// Plugins run one after another, each over the previous one's output.
#[derive(Default)]
pub struct Pipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Find a plugin by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(AsRef::as_ref)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every plugin in order. Diagnostics accumulate across plugins.
    ///
    /// # Errors
    ///
    /// Stops at the first plugin that fails.
    pub fn run(&self, directives: Vec<Directive>) -> Result<Output, Error> {
        let mut output = Output::new(directives, Vec::new());
        for plugin in &self.plugins {
            let (directives, mut diagnostics) = output.into_parts();
            let mut next = plugin.process(directives)?;
            diagnostics.append(&mut next.diagnostics);
            output = Output::new(next.directives, diagnostics);
            tracing::debug!(plugin = plugin.name(), "{output}");
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::{Amount, Custom, DeclarationKind, Posting, Transaction};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn pln(s: &str) -> Amount {
        Amount::new(Decimal::from_str(s).unwrap(), "PLN")
    }

    #[test]
    fn pipeline_tags_then_splits() {
        let directives: Vec<Directive> = vec![
            Custom::filter_map(day(), DeclarationKind::Apply)
                .meta("account", "Expenses:Office")
                .meta("addTags", "#vat")
                .into(),
            Transaction::new(day(), "Office Supplies")
                .posting(Posting::new("Expenses:Office", pln("123.00")))
                .posting(Posting::new("Assets:Bank", pln("-123.00")))
                .into(),
        ];
        let pipeline = Pipeline::new()
            .with(FilterMap::new())
            .with(Vat::from_config_str("{'rate': '0.23'}").unwrap());
        assert_eq!(pipeline.names(), ["filter_map", "vat"]);

        let output = pipeline.run(directives).unwrap();
        let txn = output.transactions().next().unwrap();
        assert!(txn.has_tag("vat"));
        assert_eq!(txn.postings.len(), 3);
        assert_eq!(txn.postings[2].units, Some(pln("23.00")));
    }

    #[test]
    fn pipeline_stops_on_config_error() {
        let directives: Vec<Directive> = vec![Custom::filter_map(day(), DeclarationKind::Apply)
            .meta("preset", "missing")
            .into()];
        let pipeline = Pipeline::new().with(FilterMap::new()).with(Vat::default());
        assert!(pipeline.run(directives).is_err());
    }

    #[test]
    fn find_by_name() {
        let pipeline = Pipeline::new().with(Vat::default());
        assert!(pipeline.find("vat").is_some());
        assert!(pipeline.find("filter_map").is_none());
    }
}
