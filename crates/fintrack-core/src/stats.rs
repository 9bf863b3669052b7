//! Comparative statistics: this month vs the previous month

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{valid_transactions, Transaction};
use crate::period::{all_time_totals, month_totals, MonthKey};

/// Multiplier behind the dashboard's "predicted next month" income figure
pub const NAIVE_INCOME_GROWTH: f64 = 1.05;

/// Dashboard headline numbers with month-over-month changes (in percent)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// All-time income minus all-time expenses
    pub total_balance: f64,
    pub balance_change: f64,
    pub monthly_income: f64,
    pub income_change: f64,
    pub monthly_expenses: f64,
    pub expenses_change: f64,
    /// Current month income minus expenses
    pub savings: f64,
    pub savings_change: f64,
}

/// Income figures for the income breakdown card
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    pub current_month: f64,
    pub previous_month: f64,
    pub change: f64,
    /// Flat +5% over the current month. Not a forecast.
    pub predicted_next_month: f64,
}

/// Percentage change from `previous` to `current`.
///
/// A zero baseline reports 100 for any positive current value and 0
/// otherwise.
pub fn calculate_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Stats relative to the current calendar month
pub fn compute_stats(transactions: &[Transaction]) -> StatsSnapshot {
    compute_stats_as_of(transactions, chrono::Local::now().date_naive())
}

/// Stats relative to the month containing `as_of`
pub fn compute_stats_as_of(transactions: &[Transaction], as_of: NaiveDate) -> StatsSnapshot {
    let valid = valid_transactions(transactions);
    snapshot(&valid, as_of)
}

pub(crate) fn snapshot(transactions: &[&Transaction], as_of: NaiveDate) -> StatsSnapshot {
    let current_month = MonthKey::from_date(as_of);
    let current = month_totals(transactions.iter().copied(), current_month);
    let previous = month_totals(transactions.iter().copied(), current_month.previous());
    let overall = all_time_totals(transactions.iter().copied());

    StatsSnapshot {
        total_balance: overall.balance,
        balance_change: calculate_change(current.balance, previous.balance),
        monthly_income: current.income,
        income_change: calculate_change(current.income, previous.income),
        monthly_expenses: current.expense,
        expenses_change: calculate_change(current.expense, previous.expense),
        savings: current.balance,
        savings_change: calculate_change(current.balance, previous.balance),
    }
}

/// Current vs previous month income plus the naive next-month projection
pub fn income_summary(transactions: &[Transaction], as_of: NaiveDate) -> IncomeSummary {
    let valid = valid_transactions(transactions);
    let month = MonthKey::from_date(as_of);
    let current = month_totals(valid.iter().copied(), month).income;
    let previous = month_totals(valid.iter().copied(), month.previous()).income;

    IncomeSummary {
        current_month: current,
        previous_month: previous,
        change: calculate_change(current, previous),
        predicted_next_month: current * NAIVE_INCOME_GROWTH,
    }
}
