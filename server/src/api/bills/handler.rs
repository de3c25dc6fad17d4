//! Bill API Handlers
//!
//! Bills are read-mostly: the only write endpoint is `create`, which shares
//! the settlement engine's compute-and-upsert path without locking anything.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::request::BillCreateRequest;

use crate::core::ServerState;
use crate::db::models::Bill;
use crate::db::repository::{BillRepository, OrderRepository};
use crate::settlement::SettlementEngine;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/bills - list bills, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Bill>>>> {
    let repo = BillRepository::new(state.db.clone());
    let bills = repo.find_all(query.limit, query.offset).await?;
    Ok(ok(bills))
}

/// GET /api/bills/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Bill>>> {
    let repo = BillRepository::new(state.db.clone());
    let bill = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bill {}", id)))?;
    Ok(ok(bill))
}

/// GET /api/bills/by-order/{order_id}
pub async fn get_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<Bill>>> {
    let record_id = OrderRepository::record_id(&order_id)?;
    let repo = BillRepository::new(state.db.clone());
    let bill = repo
        .find_by_order(&record_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No bill exists for order {}", order_id)))?;
    Ok(ok(bill))
}

/// POST /api/bills/create - create or recompute the bill for an order
///
/// Recomputes from the order's current snapshot. Rejected once the bill is
/// locked by settlement.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BillCreateRequest>,
) -> AppResult<Json<AppResponse<Bill>>> {
    let engine = SettlementEngine::new(state.db.clone());
    let (bill, created) = engine
        .preview_bill(&payload.order_id, payload.updated_by)
        .await?;
    let message = if created {
        "Bill created"
    } else {
        "Bill recomputed"
    };
    Ok(ok_with_message(bill, message))
}
