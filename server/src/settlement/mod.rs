//! Order Settlement
//!
//! Owns the pending → delivered state machine: computing the bill for an
//! order, locking order and bill exactly once, and crediting the
//! distributor wallet.
//!
//! Split into two layers:
//! - [`compute`] — pure, side-effect-free bill arithmetic
//! - [`engine`] — the persistence choreography around it (guards, bill
//!   upsert, atomic claim, wallet credit)

pub mod compute;
pub mod engine;

pub use compute::{BillComputation, DamagedDeclaration, compute_bill};
pub use engine::SettlementEngine;

#[cfg(test)]
mod tests;
