//! Test utilities for fintrack-core
//!
//! Builders for transaction snapshots, shared with the server and CLI test
//! suites through the `test-utils` feature.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use crate::models::{NewTransaction, Transaction, TransactionType};

static COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_id() -> String {
    format!("tx-{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Build a transaction with an auto-generated id
pub fn transaction(
    tx_type: TransactionType,
    amount: f64,
    category: &str,
    name: &str,
    date: NaiveDate,
) -> Transaction {
    Transaction {
        id: next_id(),
        amount,
        tx_type,
        category: category.to_string(),
        date,
        name: name.to_string(),
        payment_method: None,
    }
}

/// Income transaction named after its category
pub fn income(amount: f64, category: &str, date: NaiveDate) -> Transaction {
    transaction(TransactionType::Income, amount, category, category, date)
}

/// Expense transaction named after its category
pub fn expense(amount: f64, category: &str, date: NaiveDate) -> Transaction {
    transaction(TransactionType::Expense, amount, category, category, date)
}

/// Expense transaction with a distinct merchant/description name
pub fn named_expense(amount: f64, category: &str, name: &str, date: NaiveDate) -> Transaction {
    transaction(TransactionType::Expense, amount, category, name, date)
}

/// A `NewTransaction` ready for insertion into a store
pub fn new_transaction(
    tx_type: TransactionType,
    amount: f64,
    category: &str,
    name: &str,
    date: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        date,
        name: name.to_string(),
        category: category.to_string(),
        tx_type,
        amount,
        payment_method: None,
    }
}

/// Shorthand for a valid calendar date
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}
