//! Order Model
//!
//! Lifecycle: created `pending`/unlocked, mutable while unlocked, then
//! transitioned to `delivered`/locked exactly once by the settlement claim.
//! `locked == true` always implies `status == delivered` and freezes items,
//! dates and damaged-product stamps.

use serde::{Deserialize, Serialize};
use shared::{Actor, Cents, OrderStatus};
use surrealdb::RecordId;

use super::serde_helpers;

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Record link to product
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub quantity: i64,
    pub unit: String,
}

/// Damaged-product stamp written at settlement time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamagedProduct {
    /// Record link to product
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub product_name: String,
    /// Damaged packets
    pub damaged_quantity: i64,
    /// Deducted cost for this line, cents
    pub cost: Cents,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Actor that placed the order (admin or staff)
    pub placed_by: Actor,
    /// Record link to distributor
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub distributor: Option<RecordId>,
    /// Requested delivery date, YYYY-MM-DD
    pub order_date: String,
    /// Actual delivery date, stamped by settlement
    pub delivery_date: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub locked: bool,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub damaged_products: Vec<DamagedProduct>,
    #[serde(default)]
    pub total_damaged_cost: Cents,
    pub final_bill_amount: Option<Cents>,
    pub customer_phone: Option<String>,
    pub updated_by: Option<Actor>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// True once the order has been settled and frozen
    pub fn is_settled(&self) -> bool {
        self.locked || self.status == OrderStatus::Delivered
    }
}

/// Fields mutable while an order is unlocked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub updated_by: Actor,
    pub updated_at: i64,
}
