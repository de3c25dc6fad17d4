//! API routing
//!
//! # Structure
//!
//! - [`health`] - liveness and database check
//! - [`orders`] - order CRUD and delivery settlement
//! - [`bills`] - bill lookup and out-of-band recomputation
//! - [`wallets`] - distributor wallet balance and manual adjustments
//! - [`products`] - product catalog CRUD
//! - [`distributors`] - distributor CRUD
//!
//! Every handler responds with the [`AppResponse`] envelope; errors go
//! through [`AppError::into_response`].
//!
//! [`AppError::into_response`]: crate::utils::AppError

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod bills;
pub mod distributors;
pub mod health;
pub mod orders;
pub mod products;
pub mod wallets;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(bills::router())
        .merge(wallets::router())
        .merge(products::router())
        .merge(distributors::router())
        .merge(health::router())
}

/// Build the application with middleware applied
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app() -> Router<ServerState> {
    build_router()
        // CORS - the front-end is served from a different origin
        .layer(CorsLayer::permissive())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Unique ID per request, echoed back on the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
