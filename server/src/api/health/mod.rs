//! Health check route
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | Liveness plus a database round-trip |

use std::time::SystemTime;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    database: &'static str,
}

// Server start time, initialized on the first health check
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let db_ok = state.db.query("RETURN 1").await.is_ok();

    Json(HealthResponse {
        status: if db_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime_seconds(),
        database: if db_ok { "ok" } else { "error" },
    })
}
