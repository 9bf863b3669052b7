//! Report handlers: chart series and breakdowns

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{load_snapshot, resolve_as_of, AsOfQuery};
use crate::{AppError, AppState};
use fintrack_core::{
    aggregate_categories, income_summary, monthly_trends, CategoryBreakdown, DateWindow,
    IncomeSummary, MonthKey, MonthlyTrend, TransactionType,
};

/// Longest trend series the API will build
pub const MAX_TREND_MONTHS: u32 = 60;

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    /// Number of months, ending with the month of `as_of` (default 6)
    pub months: Option<u32>,
    pub as_of: Option<String>,
}

/// GET /api/reports/trends - Monthly income/expense series, oldest first
pub async fn report_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendsQuery>,
) -> Result<Json<Vec<MonthlyTrend>>, AppError> {
    let months = params.months.unwrap_or(6);
    if !(1..=MAX_TREND_MONTHS).contains(&months) {
        return Err(AppError::bad_request(&format!(
            "months must be between 1 and {}",
            MAX_TREND_MONTHS
        )));
    }

    let as_of = resolve_as_of(params.as_of.as_deref())?;
    let transactions = load_snapshot(&state)?;

    Ok(Json(monthly_trends(&transactions, months as usize, as_of)))
}

#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    /// current-month (default), last-month, or all
    pub window: Option<String>,
    /// expense (default) or income
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub as_of: Option<String>,
}

/// Resolve a window preset relative to the month of `as_of`
pub(crate) fn resolve_window(window: &str, month: MonthKey) -> Result<DateWindow, AppError> {
    match window {
        "current-month" => Ok(DateWindow::Month(month)),
        "last-month" => Ok(DateWindow::Month(month.previous())),
        "all" => Ok(DateWindow::AllTime),
        other => Err(AppError::bad_request(&format!(
            "Unknown window '{}' (use current-month, last-month or all)",
            other
        ))),
    }
}

/// GET /api/reports/categories - Per-category totals, largest first
pub async fn report_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoriesQuery>,
) -> Result<Json<CategoryBreakdown>, AppError> {
    let as_of = resolve_as_of(params.as_of.as_deref())?;
    let window = resolve_window(
        params.window.as_deref().unwrap_or("current-month"),
        MonthKey::from_date(as_of),
    )?;
    let tx_type: TransactionType = params
        .tx_type
        .as_deref()
        .unwrap_or("expense")
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;

    let transactions = load_snapshot(&state)?;

    Ok(Json(aggregate_categories(&transactions, tx_type, window)))
}

/// GET /api/reports/income - Income this month vs last, with projection
pub async fn report_income(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AsOfQuery>,
) -> Result<Json<IncomeSummary>, AppError> {
    let as_of = resolve_as_of(params.as_of.as_deref())?;
    let transactions = load_snapshot(&state)?;

    Ok(Json(income_summary(&transactions, as_of)))
}
