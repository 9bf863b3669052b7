//! Fintrack Core Library
//!
//! Financial analytics over a snapshot of income and expense transactions:
//! - Period aggregation into calendar-month buckets
//! - Month-over-month comparative stats
//! - Category breakdowns
//! - Rule-based insight engine with TOML-configurable thresholds
//! - Scenario affordability simulation
//! - Transaction sources (SQLite store, JSON fixtures) and CSV import
//!
//! The analytics functions are pure: they take `&[Transaction]` and return
//! plain data. Fetching and caching belong to the caller.

pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod period;
pub mod scenario;
pub mod source;
pub mod stats;

/// Test utilities: transaction builders
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use categories::{aggregate_categories, CategoryBreakdown, CategoryTotal, DateWindow};
pub use config::InsightConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use import::{import_csv, parse_csv, ImportStats};
pub use insights::{
    compute_insights, compute_insights_as_of, Insight, InsightEngine, InsightRule, InsightType,
    Severity,
};
pub use models::{NewTransaction, Transaction, TransactionType};
pub use period::{monthly_trends, MonthKey, MonthTotals, MonthlyTrend};
pub use scenario::{simulate_scenario, RiskLevel, ScenarioParams, ScenarioResult};
pub use source::{fingerprint, FixtureSource, TransactionSource};
pub use stats::{compute_stats, compute_stats_as_of, income_summary, IncomeSummary, StatsSnapshot};
