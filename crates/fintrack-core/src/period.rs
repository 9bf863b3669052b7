//! Period aggregation: calendar-month buckets of income and expense totals
//!
//! Everything here is keyed by `(year, month)`; days only decide which
//! bucket a transaction lands in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{valid_transactions, Transaction, TransactionType};

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month number
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid(format!("Invalid month number {}", month)));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Shift by a signed number of months, rolling over year boundaries
    pub fn offset(&self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn previous(&self) -> Self {
        self.offset(-1)
    }

    pub fn next(&self) -> Self {
        self.offset(1)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Short chart label, e.g. "Feb 2024"
    pub fn label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid(format!("Invalid month '{}', expected YYYY-MM", s));
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Income/expense totals for a period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl MonthTotals {
    fn add(&mut self, tx: &Transaction) {
        match tx.tx_type {
            TransactionType::Income => self.income += tx.amount,
            TransactionType::Expense => self.expense += tx.amount,
        }
        self.balance = self.income - self.expense;
    }
}

/// One point of a monthly chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub month: MonthKey,
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Totals for the transactions falling in `month`
pub fn month_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    month: MonthKey,
) -> MonthTotals {
    let mut totals = MonthTotals::default();
    for tx in transactions {
        if month.contains(tx.date) {
            totals.add(tx);
        }
    }
    totals
}

/// Totals over the whole list, regardless of date
pub fn all_time_totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> MonthTotals {
    let mut totals = MonthTotals::default();
    for tx in transactions {
        totals.add(tx);
    }
    totals
}

/// Bucket every transaction into its month. Only months with data appear.
pub fn bucket_by_month<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<MonthKey, MonthTotals> {
    let mut buckets: BTreeMap<MonthKey, MonthTotals> = BTreeMap::new();
    for tx in transactions {
        buckets
            .entry(MonthKey::from_date(tx.date))
            .or_default()
            .add(tx);
    }
    buckets
}

/// The `count` months ending with the month of `as_of`, oldest first.
///
/// Months without transactions are present with zero totals.
pub fn trailing_months<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    count: usize,
    as_of: NaiveDate,
) -> Vec<MonthlyTrend> {
    let buckets = bucket_by_month(transactions);
    let current = MonthKey::from_date(as_of);

    (0..count)
        .rev()
        .map(|back| {
            let month = current.offset(-(back as i32));
            let totals = buckets.get(&month).copied().unwrap_or_default();
            MonthlyTrend {
                month,
                label: month.label(),
                income: totals.income,
                expense: totals.expense,
                balance: totals.balance,
            }
        })
        .collect()
}

/// Chart series for a raw snapshot; invalid records are skipped
pub fn monthly_trends(
    transactions: &[Transaction],
    count: usize,
    as_of: NaiveDate,
) -> Vec<MonthlyTrend> {
    let valid = valid_transactions(transactions);
    trailing_months(valid.iter().copied(), count, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, income};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_offset_rolls_over_years() {
        let jan = MonthKey::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), MonthKey::new(2023, 12).unwrap());
        assert_eq!(jan.offset(-13), MonthKey::new(2022, 12).unwrap());

        let dec = MonthKey::new(2023, 12).unwrap();
        assert_eq!(dec.next(), jan);
        assert_eq!(dec.offset(25), MonthKey::new(2026, 1).unwrap());
    }

    #[test]
    fn test_month_key_parse_and_display() {
        let key: MonthKey = "2024-03".parse().unwrap();
        assert_eq!(key, MonthKey::new(2024, 3).unwrap());
        assert_eq!(key.to_string(), "2024-03");
        assert_eq!(key.label(), "Mar 2024");
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("March".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_month_totals() {
        let txs = vec![
            income(1000.0, "Salary", date(2024, 2, 1)),
            expense(300.0, "Food", date(2024, 2, 14)),
            expense(50.0, "Food", date(2024, 1, 31)),
        ];

        let feb = month_totals(&txs, MonthKey::new(2024, 2).unwrap());
        assert_eq!(feb.income, 1000.0);
        assert_eq!(feb.expense, 300.0);
        assert_eq!(feb.balance, 700.0);
    }

    #[test]
    fn test_empty_month_is_zero() {
        let txs = vec![income(10.0, "Salary", date(2024, 2, 1))];
        let totals = month_totals(&txs, MonthKey::new(2019, 7).unwrap());
        assert_eq!(totals, MonthTotals::default());
        assert_eq!(month_totals(&[], MonthKey::new(2024, 2).unwrap()), MonthTotals::default());
    }

    #[test]
    fn test_trailing_months_never_skips() {
        let txs = vec![
            income(100.0, "Salary", date(2023, 11, 3)),
            expense(40.0, "Rent", date(2024, 2, 3)),
        ];

        let series = trailing_months(&txs, 6, date(2024, 2, 20));
        let months: Vec<String> = series.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(
            months,
            vec!["2023-09", "2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]
        );
        assert_eq!(series[2].income, 100.0);
        assert_eq!(series[3].balance, 0.0);
        assert_eq!(series[5].expense, 40.0);
        assert_eq!(series[5].balance, -40.0);
    }

    #[test]
    fn test_trailing_zero_months_is_empty() {
        assert!(trailing_months(&[], 0, date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_bucket_by_month_is_chronological() {
        let txs = vec![
            expense(5.0, "Food", date(2024, 3, 1)),
            income(50.0, "Salary", date(2023, 12, 1)),
            expense(7.0, "Food", date(2024, 3, 9)),
        ];
        let buckets = bucket_by_month(&txs);
        let keys: Vec<MonthKey> = buckets.keys().copied().collect();
        assert_eq!(
            keys,
            vec![MonthKey::new(2023, 12).unwrap(), MonthKey::new(2024, 3).unwrap()]
        );
        assert_eq!(buckets[&MonthKey::new(2024, 3).unwrap()].expense, 12.0);
    }

    #[test]
    fn test_all_time_totals() {
        let txs = vec![
            income(100.0, "Salary", date(2022, 1, 1)),
            expense(30.0, "Food", date(2024, 6, 1)),
        ];
        let totals = all_time_totals(&txs);
        assert_eq!(totals.balance, 70.0);
    }
}
