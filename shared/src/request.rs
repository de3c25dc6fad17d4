//! API request payloads
//!
//! Wire structures are camelCase to match the front-end JSON contract.

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::types::Cents;

/// Line item in a create/update order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i64,
    pub unit: String,
}

/// POST /api/orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub distributor_id: String,
    /// Delivery date, YYYY-MM-DD; must not be before today
    pub order_date: String,
    pub items: Vec<OrderItemInput>,
    pub customer_phone: Option<String>,
    pub placed_by: Actor,
}

/// PUT /api/orders/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdateRequest {
    pub order_date: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
    pub customer_phone: Option<String>,
    pub updated_by: Actor,
}

/// DELETE /api/orders/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDeleteRequest {
    pub deleted_by: Actor,
}

/// Damaged-product declaration in a deliver payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamagedProductInput {
    pub product_id: String,
    /// Damaged quantity, always counted in packets
    pub damaged_quantity: i64,
}

/// POST /api/orders/{id}/deliver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverRequest {
    #[serde(default)]
    pub damaged_products: Vec<DamagedProductInput>,
    pub updated_by: Actor,
}

/// POST /api/bills/create — recompute/create a bill outside the delivery flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillCreateRequest {
    pub order_id: String,
    pub updated_by: Actor,
}

/// POST /api/wallets/{id}/credit and /debit — manual admin override
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAdjustRequest {
    /// Amount in cents, must be positive
    pub amount: Cents,
    pub updated_by: Actor,
    pub note: Option<String>,
}
