//! Utility module - common helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - unified error and response types
//! - [`logger`] - tracing setup
//! - [`time`] - business date helpers
//! - [`validation`] - input validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use error::{ok, ok_with_message};
pub use result::AppResult;
