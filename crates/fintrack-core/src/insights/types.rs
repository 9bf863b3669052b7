//! Core types for the Insight Engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Category spending jumped compared to last month
    SpendingAnomaly,
    /// Savings rate is below target (or notably healthy)
    SavingsOpportunity,
    /// Recurring bills spotted among this month's expenses
    BillPrediction,
    /// One category dominates this month's spending
    CategoryTrend,
    /// Surplus large enough to fund an investment goal
    GoalRecommendation,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SpendingAnomaly => "spending_anomaly",
            InsightType::SavingsOpportunity => "savings_opportunity",
            InsightType::BillPrediction => "bill_prediction",
            InsightType::CategoryTrend => "category_trend",
            InsightType::GoalRecommendation => "goal_recommendation",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_anomaly" => Ok(InsightType::SpendingAnomaly),
            "savings_opportunity" => Ok(InsightType::SavingsOpportunity),
            "bill_prediction" => Ok(InsightType::BillPrediction),
            "category_trend" => Ok(InsightType::CategoryTrend),
            "goal_recommendation" => Ok(InsightType::GoalRecommendation),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth attention
    Warning,
    /// Should be addressed now
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A finding produced by an insight rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Stable digest of type + subject
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Monetary effect, when the rule can quantify one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
    /// Reference date of the analysis that produced this finding
    pub created_at: NaiveDate,
}

impl Insight {
    /// Create a new insight. `subject` scopes the id (category key, or a
    /// fixed name for whole-month rules).
    pub fn new(
        insight_type: InsightType,
        subject: &str,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: insight_id(insight_type, subject),
            insight_type,
            severity,
            title: title.into(),
            description: description.into(),
            impact: None,
            action_label: None,
            created_at,
        }
    }

    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self
    }
}

/// Deterministic id: first 16 hex chars of sha256("type:subject")
pub fn insight_id(insight_type: InsightType, subject: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(insight_type.as_str());
    hasher.update(b":");
    hasher.update(subject.trim().to_lowercase());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

/// Money for insight text: two decimals with thousands separators
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{:02}", if negative { "-" } else { "" }, grouped, frac)
}
