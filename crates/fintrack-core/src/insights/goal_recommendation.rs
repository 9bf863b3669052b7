//! Goal Recommendation Insight

use super::engine::{AnalysisContext, InsightRule};
use super::types::{format_amount, Insight, InsightType, Severity};

/// Suggests an investment goal when the month's surplus comfortably exceeds
/// spending
pub struct GoalRecommendationRule;

impl GoalRecommendationRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoalRecommendationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for GoalRecommendationRule {
    fn id(&self) -> InsightType {
        InsightType::GoalRecommendation
    }

    fn name(&self) -> &'static str {
        "Goal Recommendation"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let savings = ctx.stats.savings;
        let expenses = ctx.stats.monthly_expenses;

        if savings <= 0.0 || savings <= ctx.config.goal_savings_multiple * expenses {
            return vec![];
        }

        vec![Insight::new(
            self.id(),
            "investment_goal",
            Severity::Info,
            "Put your surplus to work",
            format!(
                "You saved {} this month. Consider creating an investment goal for it.",
                format_amount(savings)
            ),
            ctx.as_of,
        )
        .with_action("Create goal")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsightConfig;
    use crate::models::Transaction;
    use crate::test_utils::{expense, income, ymd};

    fn run(txs: &[Transaction]) -> Vec<Insight> {
        let config = InsightConfig::default();
        let ctx = AnalysisContext::build(txs, ymd(2024, 7, 20), &config);
        GoalRecommendationRule::new().evaluate(&ctx)
    }

    #[test]
    fn test_large_surplus() {
        let txs = vec![
            income(10_000.0, "Salary", ymd(2024, 7, 1)),
            expense(2_000.0, "Rent", ymd(2024, 7, 2)),
        ];
        let insights = run(&txs);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].impact.is_none());
        assert!(insights[0].description.contains("8,000.00"));
    }

    #[test]
    fn test_surplus_exactly_double_is_silent() {
        let txs = vec![
            income(3_000.0, "Salary", ymd(2024, 7, 1)),
            expense(1_000.0, "Rent", ymd(2024, 7, 2)),
        ];
        assert!(run(&txs).is_empty());
    }

    #[test]
    fn test_income_without_expenses() {
        let txs = vec![income(500.0, "Gift", ymd(2024, 7, 1))];
        assert_eq!(run(&txs).len(), 1);
    }

    #[test]
    fn test_deficit_is_silent() {
        let txs = vec![expense(500.0, "Rent", ymd(2024, 7, 2))];
        assert!(run(&txs).is_empty());
    }
}
