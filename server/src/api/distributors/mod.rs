//! Distributor API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/distributors | GET | List distributors |
//! | /api/distributors | POST | Create a distributor |
//! | /api/distributors/{id} | GET | Fetch one distributor |
//! | /api/distributors/{id} | PUT | Update profile fields |
//! | /api/distributors/{id} | DELETE | Delete a distributor |
//!
//! Wallet balance is read and adjusted through the wallet API, never here.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/distributors", distributor_routes())
}

fn distributor_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
