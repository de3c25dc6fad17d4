//! Order API Handlers
//!
//! Mutations go through the repository's lock-aware statements; handlers
//! only add input validation and the ownership rule (admins may modify any
//! order, staff only orders they placed).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::request::{
    DeliverRequest, OrderCreateRequest, OrderDeleteRequest, OrderUpdateRequest,
};
use shared::response::SettlementResponse;
use shared::{Actor, OrderStatus};

use crate::core::ServerState;
use crate::db::models::{Order, OrderItem, OrderUpdateData};
use crate::db::repository::{DistributorRepository, OrderRepository, ProductRepository};
use crate::settlement::SettlementEngine;
use crate::utils::time::{now_millis, parse_date, validate_not_past};
use crate::utils::validation::{
    MAX_SHORT_TEXT_LEN, validate_optional_text, validate_order_items,
};
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

/// Admins may modify any order; staff only orders they placed
fn ensure_can_modify(order: &Order, actor: &Actor) -> AppResult<()> {
    if actor.is_admin() || order.placed_by.id == actor.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Order was placed by {} and can only be modified by them or an admin",
            order.placed_by.name
        )))
    }
}

/// Convert wire line items into record links
fn to_order_items(items: &[shared::request::OrderItemInput]) -> AppResult<Vec<OrderItem>> {
    items
        .iter()
        .map(|i| {
            Ok(OrderItem {
                product: ProductRepository::record_id(&i.product_id)?,
                quantity: i.quantity,
                unit: i.unit.clone(),
            })
        })
        .collect()
}

/// GET /api/orders - list orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all(query.limit, query.offset).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(ok(order))
}

/// POST /api/orders - place an order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreateRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    validate_order_items(&payload.items)?;
    validate_optional_text(&payload.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
    let order_date = parse_date(&payload.order_date)?;
    validate_not_past(order_date)?;

    // The distributor must exist up front; settlement assumes the link is
    // resolvable.
    let distributors = DistributorRepository::new(state.db.clone());
    let distributor = distributors
        .find_by_id(&payload.distributor_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Distributor {}", payload.distributor_id)))?;
    let distributor_id = distributor
        .id
        .ok_or_else(|| AppError::internal("Distributor record missing id"))?;

    let items = to_order_items(&payload.items)?;
    let now = now_millis();
    let order = Order {
        id: None,
        placed_by: payload.placed_by,
        distributor: Some(distributor_id),
        order_date: payload.order_date,
        delivery_date: None,
        status: OrderStatus::Pending,
        locked: false,
        items,
        damaged_products: Vec::new(),
        total_damaged_cost: 0,
        final_bill_amount: None,
        customer_phone: payload.customer_phone,
        updated_by: None,
        created_at: now,
        updated_at: now,
    };

    let repo = OrderRepository::new(state.db.clone());
    let created = repo.create(order).await?;
    Ok(ok(created))
}

/// PUT /api/orders/{id} - update an unlocked order
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdateRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    ensure_can_modify(&existing, &payload.updated_by)?;

    if let Some(ref date) = payload.order_date {
        let parsed = parse_date(date)?;
        validate_not_past(parsed)?;
    }
    if let Some(ref items) = payload.items {
        validate_order_items(items)?;
    }
    validate_optional_text(&payload.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;

    let items = payload
        .items
        .as_deref()
        .map(to_order_items)
        .transpose()?;
    let data = OrderUpdateData {
        order_date: payload.order_date,
        items,
        customer_phone: payload.customer_phone,
        updated_by: payload.updated_by,
        updated_at: now_millis(),
    };

    // The lock gate lives in the statement; a settlement that lands between
    // the read above and this write still rejects the update.
    let updated = repo.update_unlocked(&id, data).await?;
    Ok(ok(updated))
}

/// DELETE /api/orders/{id} - delete an unlocked order
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderDeleteRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = OrderRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    ensure_can_modify(&existing, &payload.deleted_by)?;

    repo.delete_unlocked(&id).await?;
    Ok(ok_with_message(true, "Order deleted"))
}

/// POST /api/orders/{id}/deliver - settle the delivery
pub async fn deliver(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DeliverRequest>,
) -> AppResult<Json<AppResponse<SettlementResponse>>> {
    let engine = SettlementEngine::new(state.db.clone());
    let settlement = engine
        .settle_delivery(&id, &payload.damaged_products, payload.updated_by)
        .await?;
    Ok(ok_with_message(settlement, "Delivery settled"))
}
