//! Spending Anomaly Insight
//!
//! Flags categories whose spend jumped compared to the previous month.

use super::engine::{AnalysisContext, InsightRule};
use super::types::{format_amount, Insight, InsightType, Severity};

/// Insight that compares category spend month over month
pub struct SpendingAnomalyRule;

impl SpendingAnomalyRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpendingAnomalyRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for SpendingAnomalyRule {
    fn id(&self) -> InsightType {
        InsightType::SpendingAnomaly
    }

    fn name(&self) -> &'static str {
        "Spending Anomaly"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let warning = ctx.config.anomaly_warning_percent;
        let critical = ctx.config.anomaly_critical_percent;
        let mut insights = Vec::new();

        for current in &ctx.current_expenses.categories {
            let last = match ctx.last_month_expenses.get(&current.key) {
                Some(last) if last.amount > 0.0 => last.amount,
                _ => continue,
            };

            let increase = current.amount - last;
            let change = increase * 100.0 / last;

            // Doubling (exactly at the critical threshold) is already critical
            let severity = if change >= critical {
                Severity::Critical
            } else if change > warning {
                Severity::Warning
            } else {
                continue;
            };

            insights.push(
                Insight::new(
                    self.id(),
                    &current.key,
                    severity,
                    format!("Unusual {} spending", current.category),
                    format!(
                        "{} spending is up {:.0}% this month: {} vs {} last month",
                        current.category,
                        change.round(),
                        format_amount(current.amount),
                        format_amount(last)
                    ),
                    ctx.as_of,
                )
                .with_impact(increase)
                .with_action("Review transactions"),
            );
        }

        insights
    }
}
