//! Wallet API Handlers
//!
//! Settlement credits happen inside the settlement engine; these endpoints
//! are the manual admin overrides for corrections (damaged stock refunds,
//! cash collections). Both adjustments reuse the repository's atomic
//! statements, so a manual adjustment racing a settlement cannot lose an
//! update.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::Actor;
use shared::request::WalletAdjustRequest;
use shared::response::WalletResponse;
use tracing::info;

use crate::core::ServerState;
use crate::db::models::Distributor;
use crate::db::repository::DistributorRepository;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

fn wallet_response(distributor: Distributor) -> WalletResponse {
    WalletResponse {
        distributor_id: distributor
            .id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        distributor_name: distributor.name,
        wallet_balance: distributor.wallet_balance,
    }
}

/// Manual adjustments are admin-only
fn ensure_admin(actor: &Actor) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Manual wallet adjustments require an admin".to_string(),
        ))
    }
}

/// GET /api/wallets/{id} - current balance
pub async fn get_balance(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<WalletResponse>>> {
    let repo = DistributorRepository::new(state.db.clone());
    let distributor = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Distributor {}", id)))?;
    Ok(ok(wallet_response(distributor)))
}

/// POST /api/wallets/{id}/credit - manual credit
pub async fn credit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WalletAdjustRequest>,
) -> AppResult<Json<AppResponse<WalletResponse>>> {
    ensure_admin(&payload.updated_by)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = DistributorRepository::new(state.db.clone());
    let distributor = repo.credit(&id, payload.amount).await?;

    info!(
        target: "wallet",
        distributor = %id,
        amount = payload.amount,
        by = %payload.updated_by.name,
        note = payload.note.as_deref().unwrap_or(""),
        "Manual wallet credit"
    );
    Ok(ok_with_message(wallet_response(distributor), "Wallet credited"))
}

/// POST /api/wallets/{id}/debit - manual debit
///
/// Fails with `InsufficientFunds` rather than overdrawing the wallet.
pub async fn debit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WalletAdjustRequest>,
) -> AppResult<Json<AppResponse<WalletResponse>>> {
    ensure_admin(&payload.updated_by)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = DistributorRepository::new(state.db.clone());
    let distributor = repo.debit(&id, payload.amount).await?;

    info!(
        target: "wallet",
        distributor = %id,
        amount = payload.amount,
        by = %payload.updated_by.name,
        note = payload.note.as_deref().unwrap_or(""),
        "Manual wallet debit"
    );
    Ok(ok_with_message(wallet_response(distributor), "Wallet debited"))
}
