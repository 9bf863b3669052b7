//! Insight Engine - orchestrates rule evaluation over a transaction snapshot

use chrono::NaiveDate;

use crate::categories::{breakdown, CategoryBreakdown, DateWindow};
use crate::config::InsightConfig;
use crate::models::{valid_transactions, Transaction, TransactionType};
use crate::period::MonthKey;
use crate::stats::{snapshot, StatsSnapshot};

use super::types::{Insight, InsightType};
use super::{
    CategoryTrendRule, GoalRecommendationRule, RecurringBillRule, SavingsOpportunityRule,
    SpendingAnomalyRule,
};

/// Aggregates shared by all rules, built once per analysis
pub struct AnalysisContext<'a> {
    /// Reference date; its month is "this month"
    pub as_of: NaiveDate,
    pub current_month: MonthKey,
    /// Expense totals by category for the current month
    pub current_expenses: CategoryBreakdown,
    /// Expense totals by category for the previous month
    pub last_month_expenses: CategoryBreakdown,
    pub stats: StatsSnapshot,
    /// Every valid transaction dated in the current month, input order
    pub current_month_transactions: Vec<&'a Transaction>,
    pub config: &'a InsightConfig,
}

impl<'a> AnalysisContext<'a> {
    /// Build the context for the month containing `as_of`
    pub fn build(
        transactions: &'a [Transaction],
        as_of: NaiveDate,
        config: &'a InsightConfig,
    ) -> Self {
        let valid = valid_transactions(transactions);
        let current_month = MonthKey::from_date(as_of);

        let current_expenses = breakdown(
            &valid,
            TransactionType::Expense,
            DateWindow::Month(current_month),
        );
        let last_month_expenses = breakdown(
            &valid,
            TransactionType::Expense,
            DateWindow::Month(current_month.previous()),
        );
        let stats = snapshot(&valid, as_of);

        let current_month_transactions = valid
            .into_iter()
            .filter(|tx| current_month.contains(tx.date))
            .collect();

        Self {
            as_of,
            current_month,
            current_expenses,
            last_month_expenses,
            stats,
            current_month_transactions,
            config,
        }
    }
}

/// A single insight rule. Rules are pure and independent of each other.
pub trait InsightRule: Send + Sync {
    /// Insight type this rule emits
    fn id(&self) -> InsightType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Inspect the context and produce zero or more insights
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// The main insight engine: a fixed, ordered list of rules
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
    config: InsightConfig,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules and default thresholds
    pub fn new() -> Self {
        Self::with_config(InsightConfig::default())
    }

    /// Create an engine with the built-in rules and custom thresholds
    pub fn with_config(config: InsightConfig) -> Self {
        let mut engine = Self {
            rules: vec![],
            config,
        };

        // Registration order is output order
        engine.register(Box::new(SpendingAnomalyRule));
        engine.register(Box::new(SavingsOpportunityRule));
        engine.register(Box::new(CategoryTrendRule));
        engine.register(Box::new(RecurringBillRule));
        engine.register(Box::new(GoalRecommendationRule));

        engine
    }

    /// Append a rule; it runs after every rule registered before it
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Run every rule against the snapshot, relative to `as_of`
    pub fn analyze(&self, transactions: &[Transaction], as_of: NaiveDate) -> Vec<Insight> {
        let ctx = AnalysisContext::build(transactions, as_of, &self.config);
        self.analyze_context(&ctx)
    }

    /// Run every rule against a prepared context
    pub fn analyze_context(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut all = vec![];

        for rule in &self.rules {
            let found = rule.evaluate(ctx);
            tracing::debug!(
                rule = rule.name(),
                insight = rule.id().as_str(),
                count = found.len(),
                "Insight rule evaluated"
            );
            all.extend(found);
        }

        all
    }

    /// Get list of registered rule types, in evaluation order
    pub fn rule_types(&self) -> Vec<InsightType> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Severity;
    use crate::test_utils::{expense, income, ymd};

    struct AlwaysRule;

    impl InsightRule for AlwaysRule {
        fn id(&self) -> InsightType {
            InsightType::CategoryTrend
        }

        fn name(&self) -> &'static str {
            "Always"
        }

        fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
            vec![Insight::new(
                self.id(),
                "always",
                Severity::Info,
                "Always",
                format!("{} transactions", ctx.current_month_transactions.len()),
                ctx.as_of,
            )]
        }
    }

    #[test]
    fn test_engine_creation_order() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_types(),
            vec![
                InsightType::SpendingAnomaly,
                InsightType::SavingsOpportunity,
                InsightType::CategoryTrend,
                InsightType::BillPrediction,
                InsightType::GoalRecommendation,
            ]
        );
    }

    #[test]
    fn test_analyze_empty_snapshot() {
        let engine = InsightEngine::new();
        assert!(engine.analyze(&[], ymd(2024, 2, 1)).is_empty());
    }

    #[test]
    fn test_context_splits_months() {
        let txs = vec![
            income(1000.0, "Salary", ymd(2024, 2, 1)),
            expense(200.0, "Food", ymd(2024, 2, 3)),
            expense(100.0, "Food", ymd(2024, 1, 3)),
            expense(50.0, "Food", ymd(2023, 12, 3)),
        ];
        let config = InsightConfig::default();
        let ctx = AnalysisContext::build(&txs, ymd(2024, 2, 28), &config);

        assert_eq!(ctx.current_month, MonthKey::new(2024, 2).unwrap());
        assert_eq!(ctx.current_expenses.total, 200.0);
        assert_eq!(ctx.last_month_expenses.total, 100.0);
        assert_eq!(ctx.current_month_transactions.len(), 2);
        assert_eq!(ctx.stats.savings, 800.0);
    }

    #[test]
    fn test_registered_rule_runs_last() {
        let mut engine = InsightEngine::new();
        engine.register(Box::new(AlwaysRule));

        let txs = vec![expense(10.0, "Food", ymd(2024, 2, 3))];
        let insights = engine.analyze(&txs, ymd(2024, 2, 10));
        let last = insights.last().unwrap();
        assert_eq!(last.title, "Always");
        assert_eq!(last.description, "1 transactions");
    }
}
