//! Savings Opportunity Insight
//!
//! Grades this month's savings rate against the configured bands.

use super::engine::{AnalysisContext, InsightRule};
use super::types::{format_amount, Insight, InsightType, Severity};

/// Insight that grades the monthly savings rate
pub struct SavingsOpportunityRule;

impl SavingsOpportunityRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SavingsOpportunityRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for SavingsOpportunityRule {
    fn id(&self) -> InsightType {
        InsightType::SavingsOpportunity
    }

    fn name(&self) -> &'static str {
        "Savings Opportunity"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let income = ctx.stats.monthly_income;
        if income <= 0.0 {
            return vec![];
        }

        let config = ctx.config;
        let saved = income - ctx.stats.monthly_expenses;
        let rate = saved * 100.0 / income;
        let target = config.savings_target_rate;
        let shortfall = income * target / 100.0 - saved;

        let insight = if rate < config.savings_critical_rate {
            Insight::new(
                self.id(),
                "savings_rate",
                Severity::Critical,
                "Savings rate is critically low",
                format!(
                    "You are saving {:.1}% of your income this month. Aim for at least {:.0}%; \
                     that means setting aside {} more.",
                    rate,
                    target,
                    format_amount(shortfall)
                ),
                ctx.as_of,
            )
            .with_impact(shortfall)
            .with_action("Set a budget")
        } else if rate < target {
            Insight::new(
                self.id(),
                "savings_rate",
                Severity::Warning,
                "Room to save more",
                format!(
                    "Your savings rate is {:.1}%. Raising it to the recommended {:.0}% means \
                     saving {} more this month.",
                    rate,
                    target,
                    format_amount(shortfall)
                ),
                ctx.as_of,
            )
            .with_impact(shortfall)
            .with_action("Set a budget")
        } else if rate >= config.savings_healthy_rate {
            Insight::new(
                self.id(),
                "savings_rate",
                Severity::Info,
                "Great savings rate",
                format!(
                    "You saved {:.1}% of your income this month. Keep it up!",
                    rate
                ),
                ctx.as_of,
            )
        } else {
            return vec![];
        };

        vec![insight]
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
        let ctx = AnalysisContext::build(txs, ymd(2024, 3, 15), &config);
        SavingsOpportunityRule::new().evaluate(&ctx)
    }

    fn month(income_amount: f64, expense_amount: f64) -> Vec<Transaction> {
        vec![
            income(income_amount, "Salary", ymd(2024, 3, 1)),
            expense(expense_amount, "Living", ymd(2024, 3, 2)),
        ]
    }

    #[test]
    fn test_no_income_is_silent() {
        let txs = vec![expense(500.0, "Food", ymd(2024, 3, 2))];
        assert!(run(&txs).is_empty());
    }

    #[test]
    fn test_exactly_ten_percent_is_warning() {
        let insights = run(&month(50_000.0, 45_000.0));
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Warning);
        // 20% of 50k is 10k; 5k already saved
        assert_eq!(insights[0].impact, Some(5_000.0));
        assert!(insights[0].description.contains("20%"));
    }

    #[test]
    fn test_below_ten_percent_is_critical() {
        let insights = run(&month(1000.0, 950.0));
        assert_eq!(insights[0].severity, Severity::Critical);
        assert_eq!(insights[0].impact, Some(150.0));
    }

    #[test]
    fn test_overspending_is_critical() {
        let insights = run(&month(1000.0, 1500.0));
        assert_eq!(insights[0].severity, Severity::Critical);
    }

    #[test]
    fn test_twenty_to_thirty_is_silent() {
        assert!(run(&month(1000.0, 800.0)).is_empty());
        assert!(run(&month(1000.0, 750.0)).is_empty());
    }

    #[test]
    fn test_healthy_rate_is_info_without_impact() {
        let insights = run(&month(1000.0, 700.0));
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Info);
        assert!(insights[0].impact.is_none());
    }
}
