//! Category Trend Insight
//!
//! Reports when a single category dominates this month's spending.

use super::engine::{AnalysisContext, InsightRule};
use super::types::{format_amount, Insight, InsightType, Severity};

pub struct CategoryTrendRule;

impl CategoryTrendRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CategoryTrendRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for CategoryTrendRule {
    fn id(&self) -> InsightType {
        InsightType::CategoryTrend
    }

    fn name(&self) -> &'static str {
        "Category Trend"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let expenses = ctx.stats.monthly_expenses;
        if expenses <= 0.0 {
            return vec![];
        }

        let Some(top) = ctx.current_expenses.top() else {
            return vec![];
        };

        let share = top.amount * 100.0 / expenses;
        if share <= ctx.config.dominant_category_share {
            return vec![];
        }

        vec![Insight::new(
            self.id(),
            &top.key,
            Severity::Info,
            format!("{} leads your spending", top.category),
            format!(
                "{} accounts for {:.0}% of this month's expenses ({}).",
                top.category,
                share,
                format_amount(top.amount)
            ),
            ctx.as_of,
        )
        .with_impact(top.amount)
        .with_action("View breakdown")]
    }
}
