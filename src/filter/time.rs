use chrono::{Datelike, NaiveDate};

use super::{Predicate, PredicateError};
use crate::Transaction;

/// A half-open date interval `[begin, end)`.
///
/// Parsed from a year (`2025`), a month (`2025-03`), a quarter (`2025-Q1`),
/// a day (`2025-03-14`), or two of those joined by ` - ` or ` to `, in which
/// case the interval runs from the start of the first period to the end of
/// the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    begin: NaiveDate,
    end: NaiveDate,
}

impl TimeRange {
    #[must_use]
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self { begin, end }
    }

    /// Parse a period expression.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError::InvalidTimeRange`] for an unknown period or
    /// a range whose end precedes its beginning.
    pub fn parse(spec: &str) -> Result<Self, PredicateError> {
        let spec = spec.trim();
        let invalid = |reason: String| PredicateError::InvalidTimeRange {
            spec: spec.to_owned(),
            reason,
        };

        let (first, last) = split_range(spec).unwrap_or((spec, spec));
        let (begin, _) =
            period(first).ok_or_else(|| invalid(format!("unrecognized period '{first}'")))?;
        let (_, end) =
            period(last).ok_or_else(|| invalid(format!("unrecognized period '{last}'")))?;

        if end <= begin {
            return Err(invalid("range ends before it begins".to_owned()));
        }
        Ok(Self { begin, end })
    }

    #[must_use]
    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin <= date && date < self.end
    }
}

impl Predicate for TimeRange {
    fn matches(&self, txn: &Transaction) -> bool {
        self.contains(txn.date)
    }
}

fn split_range(spec: &str) -> Option<(&str, &str)> {
    [" to ", " - "]
        .iter()
        .find_map(|sep| spec.split_once(sep))
        .map(|(a, b)| (a.trim(), b.trim()))
}

fn period(s: &str) -> Option<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [y] => {
            let year = year(y)?;
            Some((first_of(year, 1)?, first_of(year + 1, 1)?))
        }
        [y, q] if q.starts_with(['Q', 'q']) => {
            let year = year(y)?;
            let quarter: u32 = q[1..].parse().ok()?;
            if !(1..=4).contains(&quarter) {
                return None;
            }
            let month = (quarter - 1) * 3 + 1;
            let begin = first_of(year, month)?;
            Some((begin, next_month(begin, 3)?))
        }
        [y, m] => {
            let begin = first_of(year(y)?, number(m)?)?;
            Some((begin, next_month(begin, 1)?))
        }
        [y, m, d] => {
            let day = NaiveDate::from_ymd_opt(year(y)?, number(m)?, number(d)?)?;
            Some((day, day.succ_opt()?))
        }
        _ => None,
    }
}

fn year(s: &str) -> Option<i32> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn number(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn first_of(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn next_month(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0() + months;
    let year = date.year() + i32::try_from(total / 12).ok()?;
    first_of(year, total % 12 + 1)
}
