use std::collections::HashMap;

use surrealdb::RecordId;

use super::compute::{DamagedDeclaration, compute_bill};
use crate::db::models::{OrderItem, Product};

fn product(
    key: &str,
    name: &str,
    cost_per_tub: Option<i64>,
    cost_per_packet: Option<i64>,
    packets_per_tub: Option<i64>,
) -> (String, Product) {
    let id = RecordId::from_table_key("product", key);
    (
        id.to_string(),
        Product {
            id: Some(id),
            name: name.to_string(),
            unit: "tubs".to_string(),
            cost_per_tub,
            cost_per_packet,
            packets_per_tub,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        },
    )
}

fn item(key: &str, quantity: i64) -> OrderItem {
    OrderItem {
        product: RecordId::from_table_key("product", key),
        quantity,
        unit: "tubs".to_string(),
    }
}

fn damaged(key: &str, packets: i64) -> DamagedDeclaration {
    DamagedDeclaration {
        product: RecordId::from_table_key("product", key),
        packets,
    }
}

#[test]
fn prices_lines_from_tub_cost() {
    let products: HashMap<_, _> = [product("milk", "Toned Milk", Some(100), Some(10), Some(10))]
        .into_iter()
        .collect();

    let result = compute_bill(&[item("milk", 2)], &[], &products);

    assert_eq!(result.subtotal, 200);
    assert_eq!(result.total_damaged_cost, 0);
    assert_eq!(result.total_amount, 200);
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].unit_price, 100);
    assert_eq!(result.items[0].line_total, 200);
    assert!(result.damaged_items.is_empty());
}

#[test]
fn derives_tub_cost_from_packet_economics() {
    // 10 cents a packet, 5 packets a tub => 50 a tub, 3 tubs => 150
    let products: HashMap<_, _> = [product("curd", "Curd", None, Some(10), Some(5))]
        .into_iter()
        .collect();

    let result = compute_bill(&[item("curd", 3)], &[], &products);

    assert_eq!(result.items[0].unit_price, 50);
    assert_eq!(result.total_amount, 150);
}

#[test]
fn missing_pricing_prices_line_at_zero() {
    let products: HashMap<_, _> = [product("ghee", "Ghee", None, None, None)]
        .into_iter()
        .collect();

    let result = compute_bill(&[item("ghee", 4)], &[], &products);

    assert_eq!(result.subtotal, 0);
    assert_eq!(result.total_amount, 0);
    assert_eq!(result.items[0].unit_price, 0);
}

#[test]
fn unknown_product_prices_line_at_zero() {
    let result = compute_bill(&[item("ghost", 4)], &[], &HashMap::new());

    assert_eq!(result.subtotal, 0);
    assert_eq!(result.items[0].product_name, "product:ghost");
}

#[test]
fn damaged_packets_deducted_at_packet_cost() {
    let products: HashMap<_, _> = [product("milk", "Toned Milk", Some(100), Some(10), Some(10))]
        .into_iter()
        .collect();

    // 2 tubs = 200, 2 damaged packets at 10 => 180
    let result = compute_bill(&[item("milk", 2)], &[damaged("milk", 2)], &products);

    assert_eq!(result.subtotal, 200);
    assert_eq!(result.total_damaged_cost, 20);
    assert_eq!(result.total_amount, 180);
    assert_eq!(result.damaged_items.len(), 1);
    assert_eq!(result.damaged_items[0].price_per_packet, 10);
    assert_eq!(result.damaged_products[0].cost, 20);
}

#[test]
fn final_amount_clamps_at_zero() {
    let products: HashMap<_, _> = [product("milk", "Toned Milk", Some(100), Some(10), Some(10))]
        .into_iter()
        .collect();

    // 1 tub = 100, 50 damaged packets = 500 => clamp to 0
    let result = compute_bill(&[item("milk", 1)], &[damaged("milk", 50)], &products);

    assert_eq!(result.subtotal, 100);
    assert_eq!(result.total_damaged_cost, 500);
    assert_eq!(result.total_amount, 0);
}

#[test]
fn zero_quantity_declarations_are_ignored() {
    let products: HashMap<_, _> = [product("milk", "Toned Milk", Some(100), Some(10), Some(10))]
        .into_iter()
        .collect();

    let result = compute_bill(&[item("milk", 2)], &[damaged("milk", 0)], &products);

    assert!(result.damaged_items.is_empty());
    assert!(result.damaged_products.is_empty());
    assert_eq!(result.total_amount, 200);
}

#[test]
fn extreme_amounts_saturate_instead_of_wrapping() {
    let products: HashMap<_, _> = [
        product("gold", "Gold Tub", Some(i64::MAX), Some(i64::MAX), None),
    ]
    .into_iter()
    .collect();

    let result = compute_bill(&[item("gold", 2)], &[damaged("gold", 2)], &products);

    assert_eq!(result.subtotal, i64::MAX);
    assert_eq!(result.total_damaged_cost, i64::MAX);
    assert_eq!(result.total_amount, 0);
}

#[test]
fn recomputation_is_deterministic() {
    let products: HashMap<_, _> = [
        product("milk", "Toned Milk", Some(100), Some(10), Some(10)),
        product("curd", "Curd", None, Some(10), Some(5)),
    ]
    .into_iter()
    .collect();
    let items = [item("milk", 2), item("curd", 3)];
    let declared = [damaged("milk", 1)];

    let first = compute_bill(&items, &declared, &products);
    let second = compute_bill(&items, &declared, &products);

    assert_eq!(first.subtotal, second.subtotal);
    assert_eq!(first.total_damaged_cost, second.total_damaged_cost);
    assert_eq!(first.total_amount, second.total_amount);
    assert_eq!(first.subtotal, 350);
    assert_eq!(first.total_amount, 340);
}
