//! Bill computation
//!
//! Deterministic mapping from an order's line items (with resolved product
//! costs) and the damaged-goods declarations to bill lines and totals. No
//! I/O happens here; the numeric policy (cost fallback, zero-floor clamp)
//! lives in this one place and is shared by the settlement engine and the
//! bill preview endpoint.
//!
//! All arithmetic is integer cents, so recomputation is exact: re-running
//! with the same inputs always yields the same bill.

use std::collections::HashMap;

use shared::Cents;
use surrealdb::RecordId;

use crate::db::models::{BillItem, DamagedBillItem, DamagedProduct, OrderItem, Product};

/// Damaged-goods declaration with the product reference already resolved
#[derive(Debug, Clone)]
pub struct DamagedDeclaration {
    pub product: RecordId,
    /// Damaged quantity in packets
    pub packets: i64,
}

/// Result of a bill computation
#[derive(Debug, Clone)]
pub struct BillComputation {
    pub items: Vec<BillItem>,
    pub damaged_items: Vec<DamagedBillItem>,
    /// Order-side damaged stamps, parallel to `damaged_items`
    pub damaged_products: Vec<DamagedProduct>,
    /// Sum of order line totals
    pub subtotal: Cents,
    /// Sum of damaged line totals
    pub total_damaged_cost: Cents,
    /// max(subtotal - total_damaged_cost, 0)
    pub total_amount: Cents,
}

/// Display name for a product reference, tolerating catalog gaps
fn product_name(products: &HashMap<String, Product>, id: &RecordId) -> String {
    products
        .get(&id.to_string())
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Compute bill lines and totals
///
/// Line pricing: quantity × effective per-tub cost (`cost_per_tub`, else
/// `cost_per_packet × packets_per_tub`, else zero — a catalog gap prices
/// the line at zero rather than blocking delivery).
///
/// Damaged lines: packets × per-packet cost, always counted in packets.
/// Declarations with zero packets are ignored.
///
/// The final amount clamps at zero; damage can cancel a bill, never turn
/// it into a charge against the distributor.
pub fn compute_bill(
    items: &[OrderItem],
    damaged: &[DamagedDeclaration],
    products: &HashMap<String, Product>,
) -> BillComputation {
    let mut bill_items = Vec::with_capacity(items.len());
    let mut subtotal: Cents = 0;

    // Quantities and unit costs are bounded by input validation; saturate
    // instead of wrapping if an out-of-band write exceeds those bounds.
    for item in items {
        let unit_price = products
            .get(&item.product.to_string())
            .map(Product::effective_cost_per_tub)
            .unwrap_or(0);
        let line_total = unit_price.saturating_mul(item.quantity);
        subtotal = subtotal.saturating_add(line_total);

        bill_items.push(BillItem {
            product_name: product_name(products, &item.product),
            quantity: item.quantity,
            unit: item.unit.clone(),
            unit_price,
            line_total,
        });
    }

    let mut damaged_items = Vec::new();
    let mut damaged_products = Vec::new();
    let mut total_damaged_cost: Cents = 0;

    for declaration in damaged {
        if declaration.packets <= 0 {
            continue;
        }
        let price_per_packet = products
            .get(&declaration.product.to_string())
            .map(Product::effective_cost_per_packet)
            .unwrap_or(0);
        let line_total = price_per_packet.saturating_mul(declaration.packets);
        total_damaged_cost = total_damaged_cost.saturating_add(line_total);

        let name = product_name(products, &declaration.product);
        damaged_items.push(DamagedBillItem {
            product_name: name.clone(),
            packets: declaration.packets,
            price_per_packet,
            line_total,
        });
        damaged_products.push(DamagedProduct {
            product: declaration.product.clone(),
            product_name: name,
            damaged_quantity: declaration.packets,
            cost: line_total,
        });
    }

    // Zero-floor: the bill never goes negative
    let total_amount = subtotal.saturating_sub(total_damaged_cost).max(0);

    BillComputation {
        items: bill_items,
        damaged_items,
        damaged_products,
        subtotal,
        total_damaged_cost,
        total_amount,
    }
}
