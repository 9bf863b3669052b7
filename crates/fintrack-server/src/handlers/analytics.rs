//! Dashboard handlers: stats and insights

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::{load_snapshot, resolve_as_of, AsOfQuery};
use crate::{AppError, AppState};
use fintrack_core::{Insight, StatsSnapshot};

/// GET /api/stats - Headline numbers with month-over-month changes
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AsOfQuery>,
) -> Result<Json<StatsSnapshot>, AppError> {
    let as_of = resolve_as_of(params.as_of.as_deref())?;
    let transactions = load_snapshot(&state)?;
    let analysis = state
        .cache
        .get_or_compute(&state.engine, &transactions, as_of)
        .await?;

    Ok(Json(analysis.stats))
}

/// GET /api/insights - Rule engine findings for the month of `as_of`
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AsOfQuery>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let as_of = resolve_as_of(params.as_of.as_deref())?;
    let transactions = load_snapshot(&state)?;
    let analysis = state
        .cache
        .get_or_compute(&state.engine, &transactions, as_of)
        .await?;

    Ok(Json(analysis.insights.clone()))
}

/// GET /api/health - Liveness plus a description of the data source
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "source": state.source.describe(),
        "writable": state.db.is_some(),
    }))
}
