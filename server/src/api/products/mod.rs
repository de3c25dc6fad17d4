//! Product API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/products | GET | List products |
//! | /api/products | POST | Create a product |
//! | /api/products/{id} | GET | Fetch one product |
//! | /api/products/{id} | PUT | Update a product |
//! | /api/products/{id} | DELETE | Delete a product |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
