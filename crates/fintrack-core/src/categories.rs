//! Category aggregation for pie charts and "top category" queries

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{valid_transactions, Transaction, TransactionType};
use crate::period::MonthKey;

/// Which transactions a breakdown covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    AllTime,
    Month(MonthKey),
    /// Inclusive on both ends
    Range(NaiveDate, NaiveDate),
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::AllTime => true,
            Self::Month(month) => month.contains(date),
            Self::Range(from, to) => *from <= date && date <= *to,
        }
    }
}

/// Summed amount for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Label as first seen in the input
    pub category: String,
    /// Lower-cased grouping key
    pub key: String,
    pub amount: f64,
    pub transaction_count: usize,
    /// Share of the breakdown total, 0-100
    pub percentage: f64,
}

/// Per-category totals ordered by descending amount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub total: f64,
    pub categories: Vec<CategoryTotal>,
}

impl CategoryBreakdown {
    /// Largest category, if any
    pub fn top(&self) -> Option<&CategoryTotal> {
        self.categories.first()
    }

    /// Case-insensitive lookup
    pub fn get(&self, category: &str) -> Option<&CategoryTotal> {
        let key = normalize(category);
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

pub fn normalize(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Aggregate `tx_type` transactions inside `window` by category
pub fn aggregate_categories(
    transactions: &[Transaction],
    tx_type: TransactionType,
    window: DateWindow,
) -> CategoryBreakdown {
    let valid = valid_transactions(transactions);
    breakdown(&valid, tx_type, window)
}

pub(crate) fn breakdown(
    transactions: &[&Transaction],
    tx_type: TransactionType,
    window: DateWindow,
) -> CategoryBreakdown {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut categories: Vec<CategoryTotal> = Vec::new();
    let mut total = 0.0;

    for tx in transactions
        .iter()
        .filter(|tx| tx.tx_type == tx_type && window.contains(tx.date))
    {
        let key = normalize(&tx.category);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            categories.push(CategoryTotal {
                category: tx.category.trim().to_string(),
                key,
                amount: 0.0,
                transaction_count: 0,
                percentage: 0.0,
            });
            categories.len() - 1
        });

        let entry = &mut categories[slot];
        entry.amount += tx.amount;
        entry.transaction_count += 1;
        total += tx.amount;
    }

    for cat in &mut categories {
        cat.percentage = if total > 0.0 {
            cat.amount / total * 100.0
        } else {
            0.0
        };
    }

    // Stable sort: equal amounts keep first-seen order
    categories.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    CategoryBreakdown { total, categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, income, ymd};

    #[test]
    fn test_groups_case_insensitively_keeping_first_casing() {
        let txs = vec![
            expense(10.0, "Food", ymd(2024, 2, 1)),
            expense(15.0, "FOOD", ymd(2024, 2, 2)),
            expense(5.0, " food ", ymd(2024, 2, 3)),
            expense(8.0, "Travel", ymd(2024, 2, 4)),
        ];

        let result = aggregate_categories(&txs, TransactionType::Expense, DateWindow::AllTime);
        assert_eq!(result.categories.len(), 2);

        let food = result.get("fOoD").unwrap();
        assert_eq!(food.category, "Food");
        assert_eq!(food.amount, 30.0);
        assert_eq!(food.transaction_count, 3);
        assert_eq!(result.total, 38.0);
        assert_eq!(result.top().unwrap().key, "food");
    }

    #[test]
    fn test_filters_by_type_and_window() {
        let feb = MonthKey::new(2024, 2).unwrap();
        let txs = vec![
            expense(10.0, "Food", ymd(2024, 2, 1)),
            expense(99.0, "Food", ymd(2024, 1, 31)),
            income(500.0, "Salary", ymd(2024, 2, 1)),
        ];

        let result = aggregate_categories(&txs, TransactionType::Expense, DateWindow::Month(feb));
        assert_eq!(result.total, 10.0);
        assert!(result.get("Salary").is_none());

        let range = DateWindow::Range(ymd(2024, 1, 31), ymd(2024, 2, 1));
        let result = aggregate_categories(&txs, TransactionType::Expense, range);
        assert_eq!(result.total, 109.0);
    }

    #[test]
    fn test_ordering_descending_with_first_seen_ties() {
        let txs = vec![
            expense(20.0, "Books", ymd(2024, 2, 1)),
            expense(50.0, "Rent", ymd(2024, 2, 1)),
            expense(20.0, "Games", ymd(2024, 2, 1)),
        ];
        let result = aggregate_categories(&txs, TransactionType::Expense, DateWindow::AllTime);
        let order: Vec<&str> = result.categories.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(order, vec!["rent", "books", "games"]);
    }

    #[test]
    fn test_totals_invariant_to_input_order() {
        let mut txs = vec![
            expense(1.5, "Food", ymd(2024, 2, 1)),
            expense(2.25, "Rent", ymd(2024, 2, 1)),
            expense(3.0, "Food", ymd(2024, 2, 1)),
            expense(4.0, "Misc", ymd(2024, 2, 1)),
        ];
        let forward = aggregate_categories(&txs, TransactionType::Expense, DateWindow::AllTime);
        txs.reverse();
        let backward = aggregate_categories(&txs, TransactionType::Expense, DateWindow::AllTime);

        for cat in &forward.categories {
            let other = backward.get(&cat.key).unwrap();
            assert_eq!(cat.amount, other.amount);
            assert_eq!(cat.transaction_count, other.transaction_count);
        }
        assert_eq!(forward.total, backward.total);
    }

    #[test]
    fn test_percentages() {
        let txs = vec![
            expense(75.0, "Rent", ymd(2024, 2, 1)),
            expense(25.0, "Food", ymd(2024, 2, 1)),
        ];
        let result = aggregate_categories(&txs, TransactionType::Expense, DateWindow::AllTime);
        assert_eq!(result.get("rent").unwrap().percentage, 75.0);
        assert_eq!(result.get("food").unwrap().percentage, 25.0);
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate_categories(&[], TransactionType::Expense, DateWindow::AllTime);
        assert!(result.is_empty());
        assert!(result.top().is_none());
        assert_eq!(result.total, 0.0);
    }
}
