use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};

use super::{Predicate, PredicateError};
use crate::Transaction;

/// Operators supported in filter comparisons. `~` is a case-insensitive
/// regular-expression search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Match,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// The transaction attribute a comparison reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterField {
    Payee,
    Narration,
    Flag,
    Date,
    /// Any posting account; the comparison holds if it holds for one of them.
    Account,
    /// A transaction metadata key.
    Meta(String),
}

impl FilterField {
    pub(crate) fn from_name(name: &str) -> Self {
        match name {
            "payee" => FilterField::Payee,
            "narration" => FilterField::Narration,
            "flag" => FilterField::Flag,
            "date" => FilterField::Date,
            "account" => FilterField::Account,
            other => FilterField::Meta(other.to_owned()),
        }
    }
}

/// Filter expression AST as written by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Compare {
        field: FilterField,
        op: CompareOp,
        value: String,
    },
    /// `#tag`
    Tag(String),
    /// `^link`
    Link(String),
    /// A bare quoted string searched in payee and narration.
    Text(String),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Match => write!(f, "~"),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Payee => write!(f, "payee"),
            FilterField::Narration => write!(f, "narration"),
            FilterField::Flag => write!(f, "flag"),
            FilterField::Date => write!(f, "date"),
            FilterField::Account => write!(f, "account"),
            FilterField::Meta(key) => write!(f, "{key}"),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Compare { field, op, value } => write!(f, "({field} {op} \"{value}\")"),
            FilterExpr::Tag(tag) => write!(f, "#{tag}"),
            FilterExpr::Link(link) => write!(f, "^{link}"),
            FilterExpr::Text(text) => write!(f, "\"{text}\""),
            FilterExpr::And(a, b) => write!(f, "({a} AND {b})"),
            FilterExpr::Or(a, b) => write!(f, "({a} OR {b})"),
            FilterExpr::Not(inner) => write!(f, "(NOT {inner})"),
        }
    }
}

/// A comparison with its operand resolved ahead of evaluation.
#[derive(Debug, Clone)]
enum Test {
    Text(CompareOp, String),
    Regex(Regex),
    Date(CompareOp, NaiveDate),
}

#[derive(Debug, Clone)]
enum CompiledFilter {
    Compare { field: FilterField, test: Test },
    Tag(String),
    Link(String),
    Text(Regex),
    And(Box<CompiledFilter>, Box<CompiledFilter>),
    Or(Box<CompiledFilter>, Box<CompiledFilter>),
    Not(Box<CompiledFilter>),
}

/// A parsed and compiled boolean filter over transactions.
///
/// ```
/// use lazybean::filter::FilterExpression;
///
/// let f = FilterExpression::parse(r#"#trip AND NOT payee ~ "airline""#).unwrap();
/// assert_eq!(f.source(), r#"#trip AND NOT payee ~ "airline""#);
/// ```
#[derive(Debug, Clone)]
pub struct FilterExpression {
    source: String,
    ast: FilterExpr,
    compiled: CompiledFilter,
}

impl FilterExpression {
    /// # Errors
    ///
    /// Returns [`PredicateError::InvalidExpression`] on a syntax error, an
    /// invalid regular expression, or a date comparison against a value that
    /// is not a `YYYY-MM-DD` date.
    pub fn parse(source: &str) -> Result<Self, PredicateError> {
        use winnow::Parser;
        let invalid = |reason: String| PredicateError::InvalidExpression {
            expr: source.to_owned(),
            reason,
        };
        let ast = super::grammar::parse_filter
            .parse(source)
            .map_err(|e| invalid(e.to_string()))?;
        let compiled = compile(&ast).map_err(invalid)?;
        Ok(Self {
            source: source.to_owned(),
            ast,
            compiled,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn ast(&self) -> &FilterExpr {
        &self.ast
    }
}

impl Predicate for FilterExpression {
    fn matches(&self, txn: &Transaction) -> bool {
        eval(&self.compiled, txn)
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, String> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| e.to_string())
}

fn compile(expr: &FilterExpr) -> Result<CompiledFilter, String> {
    Ok(match expr {
        FilterExpr::Compare { field, op, value } => {
            let test = match (field, op) {
                (_, CompareOp::Match) => Test::Regex(case_insensitive(value)?),
                (FilterField::Date, op) => {
                    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .map_err(|_| format!("'{value}' is not a date"))?;
                    Test::Date(*op, date)
                }
                (_, op) => Test::Text(*op, value.clone()),
            };
            CompiledFilter::Compare {
                field: field.clone(),
                test,
            }
        }
        FilterExpr::Tag(tag) => CompiledFilter::Tag(tag.clone()),
        FilterExpr::Link(link) => CompiledFilter::Link(link.clone()),
        FilterExpr::Text(text) => CompiledFilter::Text(case_insensitive(text)?),
        FilterExpr::And(a, b) => CompiledFilter::And(Box::new(compile(a)?), Box::new(compile(b)?)),
        FilterExpr::Or(a, b) => CompiledFilter::Or(Box::new(compile(a)?), Box::new(compile(b)?)),
        FilterExpr::Not(inner) => CompiledFilter::Not(Box::new(compile(inner)?)),
    })
}

fn ordered(op: CompareOp, ord: Ordering) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::Neq => ord != Ordering::Equal,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Gte => ord != Ordering::Less,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Lte => ord != Ordering::Greater,
        // Resolved to a regex at compile time.
        CompareOp::Match => false,
    }
}

impl Test {
    fn check(&self, text: &str) -> bool {
        match self {
            Test::Text(op, value) => ordered(*op, text.cmp(value.as_str())),
            Test::Regex(re) => re.is_match(text),
            Test::Date(op, date) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .is_ok_and(|d| ordered(*op, d.cmp(date))),
        }
    }

    fn is_negative(&self) -> bool {
        matches!(
            self,
            Test::Text(CompareOp::Neq, _) | Test::Date(CompareOp::Neq, _)
        )
    }
}

fn field_text<'t>(field: &FilterField, txn: &'t Transaction) -> Option<Cow<'t, str>> {
    match field {
        FilterField::Payee => Some(Cow::Borrowed(txn.payee.as_deref().unwrap_or(""))),
        FilterField::Narration => Some(Cow::Borrowed(txn.narration.as_deref().unwrap_or(""))),
        FilterField::Flag => Some(Cow::Owned(txn.flag.to_string())),
        FilterField::Date => Some(Cow::Owned(txn.date.to_string())),
        FilterField::Meta(key) => txn.meta.get(key).map(|v| v.text()),
        FilterField::Account => None,
    }
}

fn eval(filter: &CompiledFilter, txn: &Transaction) -> bool {
    match filter {
        CompiledFilter::Compare {
            field: FilterField::Account,
            test,
        } => {
            // `account != X` means no posting is on X.
            if test.is_negative() {
                txn.postings.iter().all(|p| test.check(&p.account))
            } else {
                txn.postings.iter().any(|p| test.check(&p.account))
            }
        }
        CompiledFilter::Compare { field, test } => {
            field_text(field, txn).is_some_and(|text| test.check(&text))
        }
        CompiledFilter::Tag(tag) => txn.tags.contains(tag),
        CompiledFilter::Link(link) => txn.links.contains(link),
        CompiledFilter::Text(re) => {
            txn.payee.as_deref().is_some_and(|p| re.is_match(p))
                || txn.narration.as_deref().is_some_and(|n| re.is_match(n))
        }
        CompiledFilter::And(a, b) => eval(a, txn) && eval(b, txn),
        CompiledFilter::Or(a, b) => eval(a, txn) || eval(b, txn),
        CompiledFilter::Not(inner) => !eval(inner, txn),
    }
}
