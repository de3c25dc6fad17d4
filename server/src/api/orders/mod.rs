//! Order API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders | GET | List orders, newest first |
//! | /api/orders | POST | Place an order |
//! | /api/orders/{id} | GET | Fetch one order |
//! | /api/orders/{id} | PUT | Update an unlocked order |
//! | /api/orders/{id} | DELETE | Delete an unlocked order |
//! | /api/orders/{id}/deliver | POST | Settle the delivery |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/deliver", post(handler::deliver))
}
