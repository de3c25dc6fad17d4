//! Shared types for MilkSync
//!
//! Common types used by the server and client tooling: actor identity,
//! order/bill statuses, and the request/response wire structures.

pub mod actor;
pub mod request;
pub mod response;
pub mod types;

// Re-exports
pub use actor::{Actor, ActorKind};
pub use serde::{Deserialize, Serialize};
pub use types::{BillStatus, Cents, OrderStatus};
