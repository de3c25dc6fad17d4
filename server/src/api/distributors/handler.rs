//! Distributor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Distributor, DistributorCreate, DistributorUpdate};
use crate::db::repository::DistributorRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// GET /api/distributors - list distributors
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Distributor>>>> {
    let repo = DistributorRepository::new(state.db.clone());
    let distributors = repo.find_all().await?;
    Ok(ok(distributors))
}

/// GET /api/distributors/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Distributor>>> {
    let repo = DistributorRepository::new(state.db.clone());
    let distributor = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Distributor {}", id)))?;
    Ok(ok(distributor))
}

/// POST /api/distributors - create a distributor
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DistributorCreate>,
) -> AppResult<Json<AppResponse<Distributor>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let repo = DistributorRepository::new(state.db.clone());
    let distributor = repo.create(payload).await?;
    Ok(ok(distributor))
}

/// PUT /api/distributors/{id} - update profile fields
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DistributorUpdate>,
) -> AppResult<Json<AppResponse<Distributor>>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let repo = DistributorRepository::new(state.db.clone());
    let distributor = repo.update(&id, payload).await?;
    Ok(ok(distributor))
}

/// DELETE /api/distributors/{id} - delete a distributor
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = DistributorRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(ok_with_message(true, "Distributor deleted"))
}
