//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::load_snapshot;
use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use fintrack_core::models::{NewTransaction, Transaction};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateTransactionResponse {
    /// New id, absent when the record was a duplicate
    pub id: Option<i64>,
    pub duplicate: bool,
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let (transactions, total) = match &state.db {
        Some(db) => (db.list_transactions(limit, offset)?, db.count_transactions()?),
        None => {
            let mut all = load_snapshot(&state)?;
            all.sort_by(|a, b| b.date.cmp(&a.date));
            let total = all.len() as i64;
            let page = all
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            (page, total)
        }
    };

    Ok(Json(TransactionResponse {
        transactions,
        total,
        limit,
        offset,
    }))
}

/// POST /api/transactions - Add a transaction to the live store
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTransactionResponse>), AppError> {
    let Json(tx) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let db = state
        .db
        .as_ref()
        .ok_or_else(|| AppError::bad_request("Transaction source is read-only"))?;

    let response = match db.insert_transaction(&tx)? {
        Some(id) => {
            tracing::info!(id, category = %tx.category, "Transaction created");
            (
                StatusCode::CREATED,
                Json(CreateTransactionResponse {
                    id: Some(id),
                    duplicate: false,
                }),
            )
        }
        None => (
            StatusCode::OK,
            Json(CreateTransactionResponse {
                id: None,
                duplicate: true,
            }),
        ),
    };

    Ok(response)
}

/// Store ids are integers; anything else cannot name a stored row
fn parse_store_id(id: &str) -> Result<i64, AppError> {
    id.parse()
        .map_err(|_| AppError::not_found(&format!("Transaction {} not found", id)))
}

/// GET /api/transactions/:id - Fetch one transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    let found = match &state.db {
        Some(db) => db.get_transaction(parse_store_id(&id)?)?,
        None => load_snapshot(&state)?.into_iter().find(|tx| tx.id == id),
    };

    found
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("Transaction {} not found", id)))
}

/// DELETE /api/transactions/:id - Remove a transaction from the live store
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| AppError::bad_request("Transaction source is read-only"))?;

    let id = parse_store_id(&id)?;
    db.delete_transaction(id)?;
    tracing::info!(id, "Transaction deleted");

    Ok(StatusCode::NO_CONTENT)
}
