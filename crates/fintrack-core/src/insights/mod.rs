//! Insight Engine - Rule-based Financial Insights
//!
//! The Insight Engine runs a fixed, ordered pipeline of independent rules over
//! a transaction snapshot and returns plain-data findings. It is pure: the same
//! snapshot and reference date always produce the same insights in the same
//! order.
//!
//! ## Built-in Rules (evaluation order)
//!
//! - **Spending Anomaly** - Category spend jumped vs last month
//! - **Savings Opportunity** - Savings rate below target (or notably healthy)
//! - **Category Trend** - One category dominates this month
//! - **Recurring Bills** - Subscription-like expenses spotted
//! - **Goal Recommendation** - Surplus large enough for an investment goal
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fintrack_core::insights::{InsightEngine, InsightConfig};
//!
//! let engine = InsightEngine::with_config(InsightConfig::load()?);
//! let insights = engine.analyze(&transactions, as_of);
//! ```

pub mod category_trend;
pub mod engine;
pub mod goal_recommendation;
pub mod recurring_bills;
pub mod savings_opportunity;
pub mod spending_anomaly;
pub mod types;

use chrono::NaiveDate;

use crate::models::Transaction;

pub use crate::config::InsightConfig;
pub use category_trend::CategoryTrendRule;
pub use engine::{AnalysisContext, InsightEngine, InsightRule};
pub use goal_recommendation::GoalRecommendationRule;
pub use recurring_bills::RecurringBillRule;
pub use savings_opportunity::SavingsOpportunityRule;
pub use spending_anomaly::SpendingAnomalyRule;
pub use types::{format_amount, insight_id, Insight, InsightType, Severity};

/// Insights for the current calendar month with default thresholds
pub fn compute_insights(transactions: &[Transaction]) -> Vec<Insight> {
    compute_insights_as_of(transactions, chrono::Local::now().date_naive())
}

/// Insights for the month containing `as_of` with default thresholds
pub fn compute_insights_as_of(transactions: &[Transaction], as_of: NaiveDate) -> Vec<Insight> {
    InsightEngine::new().analyze(transactions, as_of)
}
