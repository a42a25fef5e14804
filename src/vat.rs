//! Splitting tax-inclusive transactions into net amounts and a tax posting.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::literal::parse_mapping;
use crate::types::{
    round_half_up, Amount, ConfigError, Diagnostic, DiagnosticKind, Directive, MetaValue,
    Output, Posting, Transaction,
};

pub const DEFAULT_INPUT_ACCOUNT: &str = "Assets:VAT:Input";
pub const DEFAULT_OUTPUT_ACCOUNT: &str = "Liabilities:Taxes:VAT:Output";
pub const DEFAULT_MARKER_TAG: &str = "vat";

const INCOME_PREFIX: &str = "Income";
const EXPENSE_PREFIX: &str = "Expenses";

/// Decimal places tax amounts are rounded to.
const TAX_SCALE: u32 = 2;

/// Settings for the tax split.
///
/// ```
/// use lazybean::VatConfig;
///
/// let config = VatConfig::from_config_str("{'rate': '0.08'}").unwrap();
/// assert_eq!(config.rate().to_string(), "0.08");
/// assert_eq!(config.input_account(), "Assets:VAT:Input");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatConfig {
    rate: Decimal,
    input_account: String,
    output_account: String,
    marker_tag: String,
}

impl Default for VatConfig {
    fn default() -> Self {
        Self {
            rate: Decimal::new(23, 2),
            input_account: DEFAULT_INPUT_ACCOUNT.to_owned(),
            output_account: DEFAULT_OUTPUT_ACCOUNT.to_owned(),
            marker_tag: DEFAULT_MARKER_TAG.to_owned(),
        }
    }
}

impl VatConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a plugin configuration string such as
    /// `{'rate': '0.23', 'input_account': 'Assets:VAT:Input'}`.
    ///
    /// An empty string yields the defaults. Keys other than `rate`,
    /// `input_account` and `output_account` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedConfig`] if the string is not a mapping
    /// literal, [`ConfigError::InvalidRate`] for a rate that is not a
    /// non-negative decimal, and [`ConfigError::InvalidConfigValue`] for a
    /// non-string account.
    pub fn from_config_str(config: &str) -> Result<Self, ConfigError> {
        let mut out = Self::default();
        if config.trim().is_empty() {
            return Ok(out);
        }
        let mapping = parse_mapping(config).map_err(ConfigError::MalformedConfig)?;
        for (key, value) in &mapping {
            match key.as_str() {
                "rate" => out = out.with_rate(parse_rate(value)?)?,
                "input_account" => out.input_account = string_value(key, value)?,
                "output_account" => out.output_account = string_value(key, value)?,
                other => tracing::debug!(key = other, "ignoring unknown vat config key"),
            }
        }
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRate`] for a negative rate.
    pub fn with_rate(mut self, rate: Decimal) -> Result<Self, ConfigError> {
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(ConfigError::InvalidRate {
                value: rate.to_string(),
            });
        }
        self.rate = rate;
        Ok(self)
    }

    #[must_use]
    pub fn with_input_account(mut self, account: impl Into<String>) -> Self {
        self.input_account = account.into();
        self
    }

    #[must_use]
    pub fn with_output_account(mut self, account: impl Into<String>) -> Self {
        self.output_account = account.into();
        self
    }

    #[must_use]
    pub fn with_marker_tag(mut self, tag: impl Into<String>) -> Self {
        self.marker_tag = tag.into();
        self
    }

    #[must_use]
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    #[must_use]
    pub fn input_account(&self) -> &str {
        &self.input_account
    }

    #[must_use]
    pub fn output_account(&self) -> &str {
        &self.output_account
    }

    #[must_use]
    pub fn marker_tag(&self) -> &str {
        &self.marker_tag
    }

    /// Tax contained in a tax-inclusive `gross`, rounded half up to cents.
    ///
    /// `None` if `gross` is too large for the arithmetic.
    #[must_use]
    pub fn inclusive_tax(&self, gross: Decimal) -> Option<Decimal> {
        let divisor = Decimal::ONE.checked_add(self.rate)?;
        let tax = gross.checked_mul(self.rate)?.checked_div(divisor)?;
        Some(round_half_up(tax, TAX_SCALE))
    }
}

fn parse_rate(value: &MetaValue) -> Result<Decimal, ConfigError> {
    let invalid = || ConfigError::InvalidRate {
        value: value.text().into_owned(),
    };
    match value {
        MetaValue::Number(n) => Ok(*n),
        MetaValue::String(s) => Decimal::from_str(s.trim()).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn string_value(key: &str, value: &MetaValue) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ConfigError::InvalidConfigValue {
            key: key.to_owned(),
            value: value.to_string(),
        })
}

/// Which side of the transaction carries the tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Income,
    Expense,
}

/// Why a marked transaction was left as it was.
#[derive(Debug)]
enum Skip {
    AlreadySplit,
    NothingTaxable,
    NoGross,
    MixedCurrencies(Vec<String>),
    Overflow,
}

pub(crate) fn run(directives: Vec<Directive>, config: &VatConfig) -> Output {
    let mut out = Vec::with_capacity(directives.len());
    let mut diagnostics = Vec::new();
    let mut split_count = 0_usize;

    for directive in directives {
        let txn = match directive {
            Directive::Transaction(txn) if txn.has_tag(&config.marker_tag) => txn,
            other => {
                out.push(other);
                continue;
            }
        };
        match split(&txn, config) {
            Ok(rewritten) => {
                split_count += 1;
                out.push(Directive::Transaction(rewritten));
            }
            Err(Skip::MixedCurrencies(currencies)) => {
                let message = format!(
                    "taxable postings in several currencies ({}), left unsplit",
                    currencies.join(", ")
                );
                tracing::warn!(date = %txn.date, "{message}");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MixedCurrencies,
                    txn.date,
                    message,
                ));
                out.push(Directive::Transaction(txn));
            }
            Err(Skip::Overflow) => {
                let message = "amounts too large to split, left unsplit";
                tracing::warn!(date = %txn.date, "{message}");
                diagnostics.push(Diagnostic::new(DiagnosticKind::Overflow, txn.date, message));
                out.push(Directive::Transaction(txn));
            }
            Err(reason) => {
                tracing::trace!(date = %txn.date, ?reason, "left unsplit");
                out.push(Directive::Transaction(txn));
            }
        }
    }

    tracing::debug!(split = split_count, diagnostics = diagnostics.len(), "vat split done");
    Output::new(out, diagnostics)
}

fn split(txn: &Transaction, config: &VatConfig) -> Result<Transaction, Skip> {
    if txn
        .postings
        .iter()
        .any(|p| p.account == config.input_account || p.account == config.output_account)
    {
        return Err(Skip::AlreadySplit);
    }

    let income = taxable(txn, INCOME_PREFIX);
    let (class, selected) = if income.is_empty() {
        (Class::Expense, taxable(txn, EXPENSE_PREFIX))
    } else {
        (Class::Income, income)
    };
    let Some(&(_, first)) = selected.first() else {
        return Err(Skip::NothingTaxable);
    };

    let currency = first.currency.clone();
    let mut currencies: Vec<String> = Vec::new();
    for (_, amount) in &selected {
        if !currencies.contains(&amount.currency) {
            currencies.push(amount.currency.clone());
        }
    }
    if currencies.len() > 1 {
        return Err(Skip::MixedCurrencies(currencies));
    }

    let base = checked_total(selected.iter().map(|(_, a)| a.number.abs()))?;
    let gross = match class {
        Class::Income => base,
        Class::Expense => checked_total(
            txn.postings
                .iter()
                .filter_map(|p| p.units.as_ref())
                .filter(|a| a.currency == currency && a.is_negative())
                .map(|a| a.number.abs()),
        )?,
    };
    if gross.is_zero() || base.is_zero() {
        return Err(Skip::NoGross);
    }

    let tax = config.inclusive_tax(gross).ok_or(Skip::Overflow)?;
    let mut postings = txn.postings.clone();
    let mut assigned = Decimal::ZERO;
    for (n, (i, amount)) in selected.iter().enumerate() {
        let share = if n + 1 == selected.len() {
            tax.checked_sub(assigned)
        } else {
            share_of(tax, amount.number.abs(), base)
        }
        .ok_or(Skip::Overflow)?;
        assigned = assigned.checked_add(share).ok_or(Skip::Overflow)?;
        let number = match class {
            Class::Expense => amount.number.checked_sub(share),
            Class::Income => amount.number.checked_add(share),
        }
        .ok_or(Skip::Overflow)?;
        postings[*i].units = Some(amount.with_number(number));
    }

    let tax_posting = match class {
        Class::Expense => Posting::new(config.input_account.clone(), Amount::new(tax, &currency)),
        Class::Income => Posting::new(config.output_account.clone(), Amount::new(-tax, &currency)),
    };
    postings.push(tax_posting);
    tracing::trace!(date = %txn.date, %tax, %currency, ?class, "split transaction");

    Ok(Transaction {
        postings,
        ..txn.clone()
    })
}

fn checked_total(mut numbers: impl Iterator<Item = Decimal>) -> Result<Decimal, Skip> {
    numbers.try_fold(Decimal::ZERO, |acc, n| acc.checked_add(n).ok_or(Skip::Overflow))
}

/// `tax * part / base` rounded to cents. Large amounts fall back to scaling
/// by the ratio first, which keeps the product within `tax`.
fn share_of(tax: Decimal, part: Decimal, base: Decimal) -> Option<Decimal> {
    let share = match tax.checked_mul(part) {
        Some(product) => product.checked_div(base)?,
        None => tax.checked_mul(part.checked_div(base)?)?,
    };
    Some(round_half_up(share, TAX_SCALE))
}

/// Postings under `prefix` with explicit units, by index.
fn taxable<'t>(txn: &'t Transaction, prefix: &str) -> Vec<(usize, &'t Amount)> {
    txn.postings
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_under(prefix))
        .filter_map(|(i, p)| p.units.as_ref().map(|a| (i, a)))
        .collect()
}
