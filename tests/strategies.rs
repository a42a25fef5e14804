#![allow(dead_code)]

use chrono::NaiveDate;
use lazybean::{Amount, Custom, DeclarationKind, Directive, Posting, Transaction};
use proptest::prelude::*;
use rust_decimal::Decimal;

// --- Fixed ledger schema ---
// accounts : a few expense, income, asset and liability accounts
// amounts  : 0.01 ..= 10_000.00, two decimal places
// dates    : 2024-01-01 ..= 2025-12-31
// tags     : drawn from TAGS

pub const EXPENSES: &[&str] = &["Expenses:Office", "Expenses:Travel", "Expenses:Food"];
pub const INCOME: &[&str] = &["Income:Sales", "Income:Consulting"];
pub const FUNDING: &[&str] = &["Assets:Bank", "Assets:Cash", "Liabilities:Card"];
pub const TAGS: &[&str] = &["vat", "trip", "food", "office"];
pub const CURRENCY: &str = "PLN";

const PAYEES: &[&str] = &["Cafe", "Airline", "Paper Co", "Bakery"];
const PERIODS: &[&str] = &["2024", "2025", "2025-Q2", "2024-06 - 2025-03"];
const FILTERS: &[&str] = &["#trip", "payee == \"Cafe\"", "not #food", "\"a\" or #vat"];
const ADD_TAGS: &[&str] = &["#seen", "#a #b", "#x"];
const ADD_META: &[&str] = &["{'seen': True}", "{'project': 'alpha', 'n': 1}"];
const SET_PAYEE: &[&str] = &["Shop", "replace:{'Co': 'Company'}"];

pub fn cents(n: i64) -> Decimal {
    Decimal::new(n, 2)
}

pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2024_i32..=2025, 1_u32..=12, 1_u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_magnitude() -> impl Strategy<Value = Decimal> {
    (1_i64..=1_000_000).prop_map(cents)
}

/// A balanced expense transaction: 1..=4 positive expense postings paid from
/// 1..=2 funding postings, tagged `#vat`.
pub fn arb_expense_txn() -> impl Strategy<Value = Transaction> {
    (
        arb_date(),
        prop::collection::vec((prop::sample::select(EXPENSES), arb_magnitude()), 1..=4),
        prop::collection::vec(prop::sample::select(FUNDING), 1..=2),
    )
        .prop_map(|(date, expenses, funding)| {
            let total: Decimal = expenses.iter().map(|(_, n)| *n).sum();
            let mut txn = Transaction::new(date, "purchase").tag("vat");
            for (account, number) in expenses {
                txn = txn.posting(Posting::new(account, Amount::new(number, CURRENCY)));
            }
            balance(txn, &funding, -total)
        })
}

/// A balanced income transaction with 1..=3 negative income postings and,
/// sometimes, an expense posting that must stay untouched.
pub fn arb_income_txn() -> impl Strategy<Value = Transaction> {
    (
        arb_date(),
        prop::collection::vec((prop::sample::select(INCOME), arb_magnitude()), 1..=3),
        prop::option::of(arb_magnitude()),
        prop::sample::select(FUNDING),
    )
        .prop_map(|(date, income, fee, funding)| {
            let mut txn = Transaction::new(date, "invoice").tag("vat");
            let mut total = Decimal::ZERO;
            for (account, number) in income {
                txn = txn.posting(Posting::new(account, Amount::new(-number, CURRENCY)));
                total -= number;
            }
            if let Some(fee) = fee {
                txn = txn.posting(Posting::new("Expenses:Fees", Amount::new(fee, CURRENCY)));
                total += fee;
            }
            balance(txn, &[funding], -total)
        })
}

/// Split `amount` over the funding accounts so the transaction sums to zero.
fn balance(mut txn: Transaction, funding: &[&str], amount: Decimal) -> Transaction {
    let per = (amount / Decimal::from(funding.len())).round_dp(2);
    let mut rest = amount;
    for (i, account) in funding.iter().enumerate() {
        let number = if i + 1 == funding.len() { rest } else { per };
        rest -= number;
        txn = txn.posting(Posting::new(*account, Amount::new(number, CURRENCY)));
    }
    txn
}

/// Any kind of tax-relevant transaction.
pub fn arb_vat_txn() -> impl Strategy<Value = Transaction> {
    prop_oneof![arb_expense_txn(), arb_income_txn()]
}

/// A plain transaction for the rule engine: random payee, narration and tags.
pub fn arb_plain_txn() -> impl Strategy<Value = Transaction> {
    (
        arb_date(),
        prop::sample::select(PAYEES),
        "[a-z]{1,8}",
        prop::collection::btree_set(prop::sample::select(TAGS), 0..=2),
        prop::sample::select(EXPENSES),
        arb_magnitude(),
    )
        .prop_map(|(date, payee, narration, tags, account, number)| {
            let mut txn = Transaction::new(date, narration).payee(payee);
            for tag in tags {
                txn = txn.tag(tag);
            }
            txn.posting(Posting::new(account, Amount::new(number, CURRENCY)))
                .posting(Posting::new("Assets:Bank", Amount::new(-number, CURRENCY)))
        })
}

/// An `apply` declaration built from a random subset of fields.
pub fn arb_apply_rule() -> impl Strategy<Value = Custom> {
    (
        prop::option::of(prop::sample::select(PERIODS)),
        prop::option::of(prop::sample::select(EXPENSES)),
        prop::option::of(prop::sample::select(FILTERS)),
        prop::option::of(prop::sample::select(ADD_TAGS)),
        prop::option::of(prop::sample::select(ADD_META)),
        prop::option::of(prop::sample::select(SET_PAYEE)),
    )
        .prop_map(|(time, account, filter, tags, meta, payee)| {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let mut rule = Custom::filter_map(date, DeclarationKind::Apply);
            for (key, value) in [
                ("time", time),
                ("account", account),
                ("filter", filter),
                ("addTags", tags),
                ("addMeta", meta),
                ("setPayee", payee),
            ] {
                if let Some(value) = value {
                    rule = rule.meta(key, value);
                }
            }
            rule
        })
}

/// A ledger of 0..=4 rules followed by 1..=12 transactions.
pub fn arb_ledger() -> impl Strategy<Value = Vec<Directive>> {
    (
        prop::collection::vec(arb_apply_rule(), 0..=4),
        prop::collection::vec(arb_plain_txn(), 1..=12),
    )
        .prop_map(|(rules, txns)| {
            rules
                .into_iter()
                .map(Directive::from)
                .chain(txns.into_iter().map(Directive::from))
                .collect()
        })
}

/// Sum of all explicit amounts.
pub fn posting_sum(txn: &Transaction) -> Decimal {
    txn.postings
        .iter()
        .filter_map(|p| p.units.as_ref())
        .map(|a| a.number)
        .sum()
}
