//! Bill API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/bills | GET | List bills, newest first |
//! | /api/bills/{id} | GET | Fetch one bill |
//! | /api/bills/by-order/{order_id} | GET | Fetch the bill for an order |
//! | /api/bills/create | POST | Create or recompute the bill for an order |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bills", bill_routes())
}

fn bill_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/create", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/by-order/{order_id}", get(handler::get_by_order))
}
