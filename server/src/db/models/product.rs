//! Product Model
//!
//! Products carry per-tub and per-packet unit economics. `cost_per_tub`
//! should equal `cost_per_packet * packets_per_tub` when both are set, but
//! either may be missing; [`Product::effective_cost_per_tub`] resolves the
//! authoritative value.

use serde::{Deserialize, Serialize};
use shared::Cents;
use surrealdb::RecordId;

use super::serde_helpers;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Default ordering unit shown on bills (e.g. "tubs")
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Cost of one tub, cents
    pub cost_per_tub: Option<Cents>,
    /// Cost of one packet, cents
    pub cost_per_packet: Option<Cents>,
    /// Packets contained in one tub
    pub packets_per_tub: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_unit() -> String {
    "tubs".to_string()
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Per-tub cost used for order line pricing
    ///
    /// Falls back to `cost_per_packet * packets_per_tub` when `cost_per_tub`
    /// is absent, and to zero when pricing data is missing entirely. A
    /// data-quality gap never blocks delivery; the line prices at zero.
    pub fn effective_cost_per_tub(&self) -> Cents {
        match (self.cost_per_tub, self.cost_per_packet, self.packets_per_tub) {
            (Some(cost), _, _) => cost,
            (None, Some(per_packet), Some(packets)) => per_packet.saturating_mul(packets),
            _ => 0,
        }
    }

    /// Per-packet cost used for damaged-goods deductions (zero when unset)
    pub fn effective_cost_per_packet(&self) -> Cents {
        self.cost_per_packet.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub unit: Option<String>,
    pub cost_per_tub: Option<Cents>,
    pub cost_per_packet: Option<Cents>,
    pub packets_per_tub: Option<i64>,
}

/// Partial update; absent fields are left untouched by the MERGE
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_tub: Option<Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_packet: Option<Cents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packets_per_tub: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(
        cost_per_tub: Option<Cents>,
        cost_per_packet: Option<Cents>,
        packets_per_tub: Option<i64>,
    ) -> Product {
        Product {
            id: None,
            name: "Toned Milk".to_string(),
            unit: "tubs".to_string(),
            cost_per_tub,
            cost_per_packet,
            packets_per_tub,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn tub_cost_is_authoritative_when_present() {
        assert_eq!(product(Some(100), Some(30), Some(5)).effective_cost_per_tub(), 100);
    }

    #[test]
    fn tub_cost_derived_from_packets() {
        assert_eq!(product(None, Some(10), Some(5)).effective_cost_per_tub(), 50);
    }

    #[test]
    fn missing_pricing_is_zero() {
        assert_eq!(product(None, None, Some(5)).effective_cost_per_tub(), 0);
        assert_eq!(product(None, Some(10), None).effective_cost_per_tub(), 0);
        assert_eq!(product(None, None, None).effective_cost_per_packet(), 0);
    }
}
