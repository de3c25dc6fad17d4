//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::validation::{
    MAX_COST_CENTS, MAX_NAME_LEN, MAX_PACKETS_PER_TUB, MAX_SHORT_TEXT_LEN,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

fn validate_costs(
    cost_per_tub: Option<i64>,
    cost_per_packet: Option<i64>,
    packets_per_tub: Option<i64>,
) -> AppResult<()> {
    if let Some(cost) = cost_per_tub
        && !(0..=MAX_COST_CENTS).contains(&cost)
    {
        return Err(AppError::validation(format!(
            "costPerTub must be between 0 and {MAX_COST_CENTS}"
        )));
    }
    if let Some(cost) = cost_per_packet
        && !(0..=MAX_COST_CENTS).contains(&cost)
    {
        return Err(AppError::validation(format!(
            "costPerPacket must be between 0 and {MAX_COST_CENTS}"
        )));
    }
    if let Some(packets) = packets_per_tub
        && !(1..=MAX_PACKETS_PER_TUB).contains(&packets)
    {
        return Err(AppError::validation(format!(
            "packetsPerTub must be between 1 and {MAX_PACKETS_PER_TUB}"
        )));
    }
    Ok(())
}

/// GET /api/products - list products
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await?;
    Ok(ok(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(ok(product))
}

/// POST /api/products - create a product
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_costs(
        payload.cost_per_tub,
        payload.cost_per_packet,
        payload.packets_per_tub,
    )?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;
    Ok(ok(product))
}

/// PUT /api/products/{id} - update a product
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_costs(
        payload.cost_per_tub,
        payload.cost_per_packet,
        payload.packets_per_tub,
    )?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await?;
    Ok(ok(product))
}

/// DELETE /api/products/{id} - delete a product
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(ok_with_message(true, "Product deleted"))
}
