//! Core domain primitives

use serde::{Deserialize, Serialize};

/// Monetary amount in integer minor units (cents)
///
/// All money in MilkSync is carried as signed integer cents. Integer
/// arithmetic keeps repeated bill recomputation exact; amounts are only
/// formatted as decimal at the presentation edge.
pub type Cents = i64;

/// Order lifecycle status
///
/// `Delivered` is terminal and always set together with `locked = true`
/// in a single conditional write.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
}

/// Bill payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Completed,
}
