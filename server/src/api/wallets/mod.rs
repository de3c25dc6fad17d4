//! Wallet API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/wallets/{id} | GET | Current wallet balance |
//! | /api/wallets/{id}/credit | POST | Manual credit (admin only) |
//! | /api/wallets/{id}/debit | POST | Manual debit (admin only) |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/wallets", wallet_routes())
}

fn wallet_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_balance))
        .route("/{id}/credit", post(handler::credit))
        .route("/{id}/debit", post(handler::debit))
}
