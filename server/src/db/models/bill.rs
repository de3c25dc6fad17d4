//! Bill Model
//!
//! One bill per order (upsert key `order`), unique human-readable
//! `bill_number`. Unlocked bills are freely recomputed from the current
//! order snapshot; locking happens once, in the same settlement that locks
//! the order.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::{Actor, BillStatus, Cents};
use surrealdb::RecordId;

use super::serde_helpers;

/// Bill line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub product_name: String,
    pub quantity: i64,
    pub unit: String,
    /// Price per unit, cents
    pub unit_price: Cents,
    pub line_total: Cents,
}

/// Damaged-goods deduction line (unit is always packets)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamagedBillItem {
    pub product_name: String,
    pub packets: i64,
    /// Cost per packet, cents
    pub price_per_packet: Cents,
    pub line_total: Cents,
}

/// Bill entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Unique human-readable bill number
    pub bill_number: String,
    /// Record link to distributor
    #[serde(with = "serde_helpers::record_id")]
    pub distributor: RecordId,
    /// Record link to order (1:1, upsert key)
    ///
    /// Stored as `order_id` because `order` is a SurrealQL keyword.
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    /// Billing date, YYYY-MM-DD
    pub billing_date: String,
    pub items: Vec<BillItem>,
    #[serde(default)]
    pub damaged_items: Vec<DamagedBillItem>,
    /// Sum of order line totals, cents
    pub subtotal: Cents,
    /// Sum of damaged line totals, cents
    #[serde(default)]
    pub total_damaged_cost: Cents,
    /// max(subtotal - total_damaged_cost, 0), cents
    pub total_amount: Cents,
    pub status: BillStatus,
    #[serde(default)]
    pub locked: bool,
    pub updated_by: Option<Actor>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Freshly computed bill content, produced by the settlement computation
/// and written through [`BillRepository::upsert_for_order`]
///
/// [`BillRepository::upsert_for_order`]: crate::db::repository::BillRepository::upsert_for_order
#[derive(Debug, Clone)]
pub struct BillDraft {
    pub distributor: RecordId,
    pub order_id: RecordId,
    /// Billing date, YYYY-MM-DD
    pub billing_date: String,
    pub items: Vec<BillItem>,
    pub damaged_items: Vec<DamagedBillItem>,
    pub subtotal: Cents,
    pub total_damaged_cost: Cents,
    pub total_amount: Cents,
    pub updated_by: Actor,
}

/// Generate a bill number: date stamp plus a random disambiguator
///
/// Uniqueness is ultimately enforced by the `uniq_bill_number` index; the
/// random suffix keeps collisions rare enough that retry is never needed in
/// practice.
pub fn generate_bill_number() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("BILL-{}-{:04}", date, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_number_shape() {
        let n = generate_bill_number();
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "BILL");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 4);
    }
}
