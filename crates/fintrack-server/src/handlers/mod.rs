//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod reports;
pub mod scenario;
pub mod transactions;

// Re-export all handlers for use in router
pub use analytics::*;
pub use reports::*;
pub use scenario::*;
pub use transactions::*;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState};
use fintrack_core::models::{parse_date, Transaction};

/// Query parameter shared by every analytics endpoint
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    /// Reference date (YYYY-MM-DD); defaults to today
    pub as_of: Option<String>,
}

/// Resolve the reference date; its calendar month is "this month"
pub(crate) fn resolve_as_of(as_of: Option<&str>) -> Result<NaiveDate, AppError> {
    match as_of {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Fetch the current snapshot from the configured source
pub(crate) fn load_snapshot(state: &AppState) -> Result<Vec<Transaction>, AppError> {
    let transactions = state.source.fetch_transactions()?;
    tracing::debug!(count = transactions.len(), "Loaded transaction snapshot");
    Ok(transactions)
}
