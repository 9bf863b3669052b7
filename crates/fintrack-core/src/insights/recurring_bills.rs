//! Recurring Bill Insight
//!
//! Spots subscription-like expenses by keyword and suggests tracking them.
//! Emits at most one insight per analysis.

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightType, Severity};

pub struct RecurringBillRule;

impl RecurringBillRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecurringBillRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for RecurringBillRule {
    fn id(&self) -> InsightType {
        InsightType::BillPrediction
    }

    fn name(&self) -> &'static str {
        "Recurring Bills"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let keywords = &ctx.config.recurring_keywords;

        let matches = ctx
            .current_month_transactions
            .iter()
            .filter(|tx| tx.is_expense())
            .filter(|tx| {
                let name = tx.name.to_lowercase();
                keywords.iter().any(|k| name.contains(k.as_str()))
            })
            .count();

        if matches == 0 {
            return vec![];
        }

        vec![Insight::new(
            self.id(),
            "recurring",
            Severity::Info,
            "Recurring bills detected",
            format!(
                "{} of this month's expenses look like recurring bills. \
                 Track your subscriptions so renewals never surprise you.",
                matches
            ),
            ctx.as_of,
        )
        .with_action("Track subscriptions")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsightConfig;
    use crate::models::{Transaction, TransactionType};
    use crate::test_utils::{named_expense, transaction, ymd};

    fn run(txs: &[Transaction]) -> Vec<Insight> {
        let config = InsightConfig::default();
        let ctx = AnalysisContext::build(txs, ymd(2024, 6, 15), &config);
        RecurringBillRule::new().evaluate(&ctx)
    }

    #[test]
    fn test_single_insight_for_many_matches() {
        let txs = vec![
            named_expense(15.0, "Entertainment", "NETFLIX.COM", ymd(2024, 6, 1)),
            named_expense(10.0, "Entertainment", "Spotify Premium", ymd(2024, 6, 2)),
            named_expense(1200.0, "Housing", "June rent", ymd(2024, 6, 3)),
        ];
        let insights = run(&txs);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::BillPrediction);
        assert!(insights[0].impact.is_none());
        assert!(insights[0].description.starts_with("3 "));
    }

    #[test]
    fn test_income_and_other_months_ignored() {
        let txs = vec![
            transaction(
                TransactionType::Income,
                100.0,
                "Refund",
                "Insurance payout",
                ymd(2024, 6, 1),
            ),
            named_expense(15.0, "Entertainment", "Netflix", ymd(2024, 5, 1)),
            named_expense(40.0, "Food", "Groceries", ymd(2024, 6, 4)),
        ];
        assert!(run(&txs).is_empty());
    }

    #[test]
    fn test_custom_keywords() {
        let config = InsightConfig {
            recurring_keywords: vec!["gym".to_string()],
            ..InsightConfig::default()
        };
        let txs = vec![named_expense(30.0, "Health", "City Gym", ymd(2024, 6, 1))];
        let ctx = AnalysisContext::build(&txs, ymd(2024, 6, 15), &config);
        assert_eq!(RecurringBillRule::new().evaluate(&ctx).len(), 1);
    }
}
