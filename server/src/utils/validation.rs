//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the CRUD
//! handlers. The storage layer has no built-in length enforcement, so every
//! user-supplied string passes through here.

use shared::request::OrderItemInput;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, distributor, actor display names
pub const MAX_NAME_LEN: usize = 200;

/// Notes and free-text reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, units
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Numeric limits ──────────────────────────────────────────────────

/// Cap on line-item quantities and damaged packet counts
///
/// Keeps `quantity × unit cost` far from `i64` range even at the maximum
/// unit cost.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Cap on product unit costs, cents
pub const MAX_COST_CENTS: i64 = 1_000_000_000;

/// Cap on packets contained in one tub
pub const MAX_PACKETS_PER_TUB: i64 = 10_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate order line items: non-empty list, positive quantities, units set.
pub fn validate_order_items(items: &[OrderItemInput]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::validation("Order must have at least one item"));
    }
    for (idx, item) in items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Item {idx}: productId must not be empty"
            )));
        }
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Item {idx}: quantity must be positive, got {}",
                item.quantity
            )));
        }
        if item.quantity > MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "Item {idx}: quantity exceeds the limit of {MAX_QUANTITY}"
            )));
        }
        validate_required_text(&item.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: product_id.to_string(),
            quantity,
            unit: "tubs".to_string(),
        }
    }

    #[test]
    fn empty_item_list_rejected() {
        assert!(validate_order_items(&[]).is_err());
    }

    #[test]
    fn zero_quantity_rejected() {
        assert!(validate_order_items(&[item("product:milk", 0)]).is_err());
        assert!(validate_order_items(&[item("product:milk", -2)]).is_err());
        assert!(validate_order_items(&[item("product:milk", 3)]).is_ok());
    }

    #[test]
    fn blank_product_rejected() {
        assert!(validate_order_items(&[item("  ", 1)]).is_err());
    }

    #[test]
    fn oversized_quantity_rejected() {
        assert!(validate_order_items(&[item("product:milk", MAX_QUANTITY)]).is_ok());
        assert!(validate_order_items(&[item("product:milk", MAX_QUANTITY + 1)]).is_err());
        assert!(validate_order_items(&[item("product:milk", i64::MAX)]).is_err());
    }
}
