//! API response payloads

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::types::Cents;

/// Damaged-product line echoed back from settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamagedLine {
    pub product_id: String,
    pub product_name: String,
    /// Damaged packets
    pub packets: i64,
    /// Cost per packet, cents
    pub price_per_packet: Cents,
    pub line_total: Cents,
}

/// POST /api/orders/{id}/deliver — success body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub order_id: String,
    pub bill_id: String,
    pub bill_number: String,
    /// true when the bill was created by this settlement, false when an
    /// existing unlocked bill was recomputed
    pub bill_generated: bool,
    pub credited_amount: Cents,
    /// Distributor wallet balance after the credit
    pub wallet_balance: Cents,
    pub damaged_products: Vec<DamagedLine>,
    pub total_damaged_cost: Cents,
    /// Subtotal before damaged-goods deduction
    pub original_bill_amount: Cents,
    pub final_bill_amount: Cents,
    pub updated_by: Actor,
    /// Unix millis
    pub updated_at: i64,
}

/// GET /api/wallets/{id} and credit/debit responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub distributor_id: String,
    pub distributor_name: String,
    pub wallet_balance: Cents,
}
