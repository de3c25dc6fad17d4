//! MilkSync Server - dairy distribution management backend
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/        # Config, state, HTTP server
//! ├── api/         # HTTP routes and handlers
//! ├── db/          # Database service, models, repositories
//! ├── settlement/  # Order settlement engine + bill computation
//! └── utils/       # Errors, logging, validation, time helpers
//! ```
//!
//! The interesting part lives in [`settlement`]: the pending → delivered
//! state machine that computes a bill, locks the order and bill exactly
//! once, and credits the distributor wallet atomically.

pub mod api;
pub mod core;
pub mod db;
pub mod settlement;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use settlement::SettlementEngine;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __  ____ ____   _____
   /  |/  (_) / /__/ ___/__  ______  _____
  / /|_/ / / / //_/\__ \/ / / / __ \/ ___/
 / /  / / / / ,<  ___/ / /_/ / / / / /__
/_/  /_/_/_/_/|_|/____/\__, /_/ /_/\___/
                      /____/
    "#
    );
}
