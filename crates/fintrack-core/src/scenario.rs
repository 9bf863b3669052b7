//! Scenario affordability simulator
//!
//! Answers "can I afford X within N months?" from savings, savings
//! capacity, and the emergency fund implied by monthly expenses.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::insights::format_amount;
use crate::stats::StatsSnapshot;

/// Months of expenses an emergency fund should cover
pub const EMERGENCY_FUND_MONTHS: f64 = 6.0;

/// Share of savings capacity above which a plan is considered tight
pub const CAPACITY_STRAIN_RATIO: f64 = 0.8;

/// Purchase goal to evaluate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParams {
    pub goal_amount: f64,
    pub down_payment: f64,
    pub timeline_months: u32,
    pub current_savings: f64,
    /// Monthly amount that can be set aside; zero or negative means none
    pub monthly_savings_capacity: f64,
    /// Accept `timeline_months == 0`, treating the whole remainder as due now
    #[serde(default)]
    pub allow_zero_timeline: bool,
}

impl ScenarioParams {
    pub fn new(goal_amount: f64, down_payment: f64, timeline_months: u32) -> Self {
        Self {
            goal_amount,
            down_payment,
            timeline_months,
            current_savings: 0.0,
            monthly_savings_capacity: 0.0,
            allow_zero_timeline: false,
        }
    }

    /// Seed savings and capacity from a stats snapshot: savings are the
    /// non-negative all-time balance, capacity is this month's savings
    pub fn with_defaults_from(mut self, stats: &StatsSnapshot) -> Self {
        self.current_savings = stats.total_balance.max(0.0);
        self.monthly_savings_capacity = stats.savings;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("goalAmount", self.goal_amount),
            ("downPayment", self.down_payment),
            ("currentSavings", self.current_savings),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.monthly_savings_capacity.is_finite() {
            return Err(Error::invalid("monthlySavingsCapacity must be a number"));
        }
        if self.timeline_months == 0 && !self.allow_zero_timeline {
            return Err(Error::invalid(
                "timelineMonths must be at least 1 (set allowZeroTimeline to accept 0)",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub can_afford: bool,
    /// `None` when the goal can never be reached at the current capacity
    pub months_to_save: Option<u32>,
    pub required_monthly_savings: f64,
    pub impact_on_emergency_fund: f64,
    pub recommendation: String,
    pub risk_level: RiskLevel,
}

/// Evaluate a purchase goal against savings capacity and the emergency fund
pub fn simulate_scenario(params: &ScenarioParams, monthly_expenses: f64) -> Result<ScenarioResult> {
    params.validate()?;
    if !monthly_expenses.is_finite() || monthly_expenses < 0.0 {
        return Err(Error::invalid(format!(
            "monthlyExpenses must be a non-negative number, got {}",
            monthly_expenses
        )));
    }

    let capacity = params.monthly_savings_capacity;
    let timeline = params.timeline_months;

    let amount_needed = (params.goal_amount - params.down_payment).max(0.0);
    let remaining = (amount_needed - params.current_savings).max(0.0);

    let required_monthly_savings = if timeline > 0 {
        remaining / timeline as f64
    } else {
        remaining
    };

    let months_to_save = if remaining == 0.0 {
        Some(0)
    } else if capacity > 0.0 {
        let months = (remaining / capacity).ceil();
        // Beyond u32 is as good as never
        (months <= u32::MAX as f64).then_some(months as u32)
    } else {
        None
    };

    let can_afford = months_to_save.is_some_and(|m| m <= timeline);

    let ideal_emergency_fund = monthly_expenses * EMERGENCY_FUND_MONTHS;
    let after_purchase = params.current_savings - amount_needed;
    let impact_on_emergency_fund = if after_purchase < ideal_emergency_fund {
        (ideal_emergency_fund - after_purchase.max(0.0)).max(0.0)
    } else {
        0.0
    };

    let (risk_level, recommendation) = match months_to_save {
        None => (
            RiskLevel::High,
            "Your current savings rate is insufficient to reach this goal. \
             Increase your monthly savings or lower the target."
                .to_string(),
        ),
        Some(months) if !can_afford => (
            RiskLevel::High,
            format!(
                "At your current savings rate this goal takes {} months, beyond your \
                 {}-month timeline. Extend the timeline or save more each month.",
                months, timeline
            ),
        ),
        // Nothing left to save means no strain, whatever the capacity
        Some(_)
            if remaining > 0.0
                && required_monthly_savings > capacity * CAPACITY_STRAIN_RATIO =>
        {
            (
                RiskLevel::Medium,
                format!(
                    "This goal needs {} per month, most of your savings capacity. \
                     Leave room for unexpected costs.",
                    format_amount(required_monthly_savings)
                ),
            )
        }
        Some(_) if impact_on_emergency_fund > 0.0 => (
            RiskLevel::Medium,
            format!(
                "This purchase would leave your emergency fund {} short of six months \
                 of expenses.",
                format_amount(impact_on_emergency_fund)
            ),
        ),
        Some(_) => (
            RiskLevel::Low,
            "This goal fits comfortably within your savings plan.".to_string(),
        ),
    };

    tracing::debug!(
        remaining,
        ?months_to_save,
        risk = risk_level.as_str(),
        "Scenario simulated"
    );

    Ok(ScenarioResult {
        can_afford,
        months_to_save,
        required_monthly_savings,
        impact_on_emergency_fund,
        recommendation,
        risk_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(goal: f64, down: f64, timeline: u32, savings: f64, capacity: f64) -> ScenarioParams {
        ScenarioParams {
            current_savings: savings,
            monthly_savings_capacity: capacity,
            ..ScenarioParams::new(goal, down, timeline)
        }
    }

    #[test]
    fn test_fully_funded_goal() {
        let result = simulate_scenario(&params(50_000.0, 50_000.0, 12, 0.0, 0.0), 0.0).unwrap();
        assert_eq!(result.months_to_save, Some(0));
        assert!(result.can_afford);
        assert_eq!(result.required_monthly_savings, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_fully_funded_goal_ignores_capacity() {
        // A month where spending exceeds income seeds a negative capacity
        for capacity in [-500.0, 0.0] {
            let result =
                simulate_scenario(&params(50_000.0, 50_000.0, 12, 0.0, capacity), 0.0).unwrap();
            assert_eq!(result.months_to_save, Some(0));
            assert!(result.can_afford);
            assert_eq!(result.risk_level, RiskLevel::Low, "capacity {}", capacity);
            assert!(!result.recommendation.contains("per month"));
        }

        // Savings already cover the goal
        let covered =
            simulate_scenario(&params(20_000.0, 0.0, 6, 30_000.0, -100.0), 0.0).unwrap();
        assert_eq!(covered.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_zero_capacity_is_unreachable() {
        let result = simulate_scenario(&params(10_000.0, 0.0, 12, 0.0, 0.0), 0.0).unwrap();
        assert_eq!(result.months_to_save, None);
        assert!(!result.can_afford);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.recommendation.contains("insufficient"));

        let negative = simulate_scenario(&params(10_000.0, 0.0, 12, 0.0, -50.0), 0.0).unwrap();
        assert_eq!(negative.months_to_save, None);
    }

    #[test]
    fn test_reachable_plan_checks_emergency_fund() {
        // 120k goal, 20k down, 10 months, 15k/month capacity
        let result =
            simulate_scenario(&params(120_000.0, 20_000.0, 10, 0.0, 15_000.0), 5_000.0).unwrap();
        assert_eq!(result.required_monthly_savings, 10_000.0);
        assert_eq!(result.months_to_save, Some(7));
        assert!(result.can_afford);
        // Savings are 0, so the whole 30k ideal fund is missing
        assert_eq!(result.impact_on_emergency_fund, 30_000.0);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(result.recommendation.contains("emergency fund"));

        let no_expenses =
            simulate_scenario(&params(120_000.0, 20_000.0, 10, 0.0, 15_000.0), 0.0).unwrap();
        assert_eq!(no_expenses.impact_on_emergency_fund, 0.0);
        assert_eq!(no_expenses.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_late_beats_emergency_fund() {
        let result = simulate_scenario(&params(100_000.0, 0.0, 5, 0.0, 10_000.0), 5_000.0).unwrap();
        assert_eq!(result.months_to_save, Some(10));
        assert!(!result.can_afford);
        assert!(result.impact_on_emergency_fund > 0.0);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.recommendation.contains("10 months"));
    }

    #[test]
    fn test_capacity_strain_is_medium() {
        // 9k/month required of 10k capacity
        let result = simulate_scenario(&params(90_000.0, 0.0, 10, 0.0, 10_000.0), 0.0).unwrap();
        assert!(result.can_afford);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(result.recommendation.contains("9,000.00"));
    }

    #[test]
    fn test_savings_cover_part_of_goal() {
        let result =
            simulate_scenario(&params(100_000.0, 10_000.0, 12, 30_000.0, 6_000.0), 0.0).unwrap();
        // 90k needed, 60k remaining
        assert_eq!(result.required_monthly_savings, 5_000.0);
        assert_eq!(result.months_to_save, Some(10));
    }

    #[test]
    fn test_zero_timeline_requires_acknowledgement() {
        let p = params(1_000.0, 0.0, 0, 0.0, 100.0);
        assert!(simulate_scenario(&p, 0.0).unwrap_err().is_invalid_input());

        let p = ScenarioParams {
            allow_zero_timeline: true,
            ..p
        };
        let result = simulate_scenario(&p, 0.0).unwrap();
        assert_eq!(result.required_monthly_savings, 1_000.0);
        assert!(!result.can_afford);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(simulate_scenario(&params(-1.0, 0.0, 12, 0.0, 0.0), 0.0).is_err());
        assert!(simulate_scenario(&params(1.0, -1.0, 12, 0.0, 0.0), 0.0).is_err());
        assert!(simulate_scenario(&params(1.0, 0.0, 12, -1.0, 0.0), 0.0).is_err());
        assert!(simulate_scenario(&params(1.0, 0.0, 12, 0.0, f64::NAN), 0.0).is_err());
        assert!(simulate_scenario(&params(1.0, 0.0, 12, 0.0, 0.0), -1.0).is_err());
    }

    #[test]
    fn test_defaults_from_stats() {
        let stats = StatsSnapshot {
            total_balance: -500.0,
            savings: 1_200.0,
            ..StatsSnapshot::default()
        };
        let p = ScenarioParams::new(10_000.0, 0.0, 12).with_defaults_from(&stats);
        assert_eq!(p.current_savings, 0.0);
        assert_eq!(p.monthly_savings_capacity, 1_200.0);
    }

    #[test]
    fn test_unreachable_serializes_as_null() {
        let result = simulate_scenario(&params(10_000.0, 0.0, 12, 0.0, 0.0), 0.0).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["monthsToSave"].is_null());
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["canAfford"], false);
    }
}
