//! Scenario simulator command

use anyhow::Result;
use chrono::NaiveDate;
use fintrack_core::insights::format_amount;
use fintrack_core::{
    compute_stats_as_of, simulate_scenario, RiskLevel, ScenarioParams, ScenarioResult,
    TransactionSource,
};
use serde::Serialize;

use super::print_json;

/// Goal parameters as given on the command line. Missing savings figures
/// are seeded from the stats for `as_of`.
#[derive(Debug, Clone, Default)]
pub struct ScenarioInput {
    pub goal: f64,
    pub down_payment: f64,
    pub timeline: u32,
    pub savings: Option<f64>,
    pub capacity: Option<f64>,
    pub expenses: Option<f64>,
    pub allow_zero_timeline: bool,
}

impl ScenarioInput {
    fn needs_stats(&self) -> bool {
        self.savings.is_none() || self.capacity.is_none() || self.expenses.is_none()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioOutput<'a> {
    params: &'a ScenarioParams,
    monthly_expenses: f64,
    result: &'a ScenarioResult,
}

/// Resolve the simulator inputs, reading stats only when something is missing
pub fn resolve_scenario(
    source: &dyn TransactionSource,
    input: &ScenarioInput,
    as_of: NaiveDate,
) -> Result<(ScenarioParams, f64)> {
    let mut params = ScenarioParams {
        allow_zero_timeline: input.allow_zero_timeline,
        ..ScenarioParams::new(input.goal, input.down_payment, input.timeline)
    };
    let mut monthly_expenses = 0.0;

    if input.needs_stats() {
        let transactions = source.fetch_transactions()?;
        let stats = compute_stats_as_of(&transactions, as_of);
        params = params.with_defaults_from(&stats);
        monthly_expenses = stats.monthly_expenses;
    }

    if let Some(savings) = input.savings {
        params.current_savings = savings;
    }
    if let Some(capacity) = input.capacity {
        params.monthly_savings_capacity = capacity;
    }
    if let Some(expenses) = input.expenses {
        monthly_expenses = expenses;
    }

    Ok((params, monthly_expenses))
}

pub fn cmd_scenario(
    source: &dyn TransactionSource,
    input: &ScenarioInput,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    let (params, monthly_expenses) = resolve_scenario(source, input, as_of)?;
    let result = simulate_scenario(&params, monthly_expenses)?;

    if json {
        return print_json(&ScenarioOutput {
            params: &params,
            monthly_expenses,
            result: &result,
        });
    }

    let risk = match result.risk_level {
        RiskLevel::Low => "🟢 low",
        RiskLevel::Medium => "🟡 medium",
        RiskLevel::High => "🔴 high",
    };

    println!();
    println!("🎯 Scenario: ${} goal", format_amount(params.goal_amount));
    println!("   ─────────────────────────────────────────────");
    println!("   Down payment:        ${}", format_amount(params.down_payment));
    println!("   Current savings:     ${}", format_amount(params.current_savings));
    println!(
        "   Monthly capacity:    ${}",
        format_amount(params.monthly_savings_capacity)
    );
    println!("   Monthly expenses:    ${}", format_amount(monthly_expenses));
    println!("   Timeline:            {} months", params.timeline_months);
    println!();
    println!(
        "   Affordable:          {}",
        if result.can_afford { "✅ yes" } else { "❌ no" }
    );
    match result.months_to_save {
        Some(months) => println!("   Months to save:      {}", months),
        None => println!("   Months to save:      never at current capacity"),
    }
    println!(
        "   Required per month:  ${}",
        format_amount(result.required_monthly_savings)
    );
    println!(
        "   Emergency fund left: ${}",
        format_amount(result.impact_on_emergency_fund)
    );
    println!("   Risk:                {}", risk);
    println!();
    println!("   {}", result.recommendation);

    Ok(())
}
