//! Scenario simulator handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{load_snapshot, resolve_as_of};
use crate::{AppError, AppState};
use fintrack_core::{simulate_scenario, ScenarioParams, ScenarioResult};

/// Scenario request; omitted savings figures are seeded from current stats
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    pub goal_amount: f64,
    #[serde(default)]
    pub down_payment: f64,
    pub timeline_months: u32,
    pub current_savings: Option<f64>,
    pub monthly_savings_capacity: Option<f64>,
    pub monthly_expenses: Option<f64>,
    #[serde(default)]
    pub allow_zero_timeline: bool,
    /// Reference date for seeded stats (YYYY-MM-DD)
    pub as_of: Option<String>,
}

impl ScenarioRequest {
    fn needs_stats(&self) -> bool {
        self.current_savings.is_none()
            || self.monthly_savings_capacity.is_none()
            || self.monthly_expenses.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResponse {
    /// Inputs after seeding, as actually simulated
    pub params: ScenarioParams,
    pub monthly_expenses: f64,
    pub result: ScenarioResult,
}

/// POST /api/scenario - Evaluate a purchase goal
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Result<Json<ScenarioResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let mut params = ScenarioParams {
        allow_zero_timeline: req.allow_zero_timeline,
        ..ScenarioParams::new(req.goal_amount, req.down_payment, req.timeline_months)
    };
    let mut monthly_expenses = 0.0;

    if req.needs_stats() {
        let as_of = resolve_as_of(req.as_of.as_deref())?;
        let transactions = load_snapshot(&state)?;
        let analysis = state
            .cache
            .get_or_compute(&state.engine, &transactions, as_of)
            .await?;

        params = params.with_defaults_from(&analysis.stats);
        monthly_expenses = analysis.stats.monthly_expenses;
    }

    if let Some(savings) = req.current_savings {
        params.current_savings = savings;
    }
    if let Some(capacity) = req.monthly_savings_capacity {
        params.monthly_savings_capacity = capacity;
    }
    if let Some(expenses) = req.monthly_expenses {
        monthly_expenses = expenses;
    }

    let result = simulate_scenario(&params, monthly_expenses)?;

    Ok(Json(ScenarioResponse {
        params,
        monthly_expenses,
        result,
    }))
}
