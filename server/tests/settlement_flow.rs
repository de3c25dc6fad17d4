//! End-to-end settlement tests over an in-memory database
//!
//! These exercise the real repositories and the settlement engine, so the
//! conditional-update semantics (lock gates, delivery claim, atomic wallet
//! arithmetic) run against an actual storage engine rather than mocks.

use milksync_server::db::DbService;
use milksync_server::db::models::{Order, OrderItem};
use milksync_server::db::repository::{
    BillRepository, DistributorRepository, OrderRepository, ProductRepository, RepoError,
};
use milksync_server::settlement::SettlementEngine;
use milksync_server::utils::AppError;
use shared::request::DamagedProductInput;
use shared::{Actor, ActorKind, BillStatus, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn test_db() -> Surreal<Db> {
    DbService::memory()
        .await
        .expect("in-memory database")
        .db
}

fn admin() -> Actor {
    Actor::new(ActorKind::Admin, "admin:boss", "Boss")
}

fn staff(id: &str, name: &str) -> Actor {
    Actor::new(ActorKind::Staff, id, name)
}

async fn seed_product(
    db: &Surreal<Db>,
    name: &str,
    cost_per_tub: Option<i64>,
    cost_per_packet: Option<i64>,
    packets_per_tub: Option<i64>,
) -> surrealdb::RecordId {
    let repo = ProductRepository::new(db.clone());
    let product = repo
        .create(milksync_server::db::models::ProductCreate {
            name: name.to_string(),
            unit: Some("tubs".to_string()),
            cost_per_tub,
            cost_per_packet,
            packets_per_tub,
        })
        .await
        .expect("create product");
    product.id.expect("product id")
}

async fn seed_distributor(db: &Surreal<Db>, name: &str) -> surrealdb::RecordId {
    let repo = DistributorRepository::new(db.clone());
    let distributor = repo
        .create(milksync_server::db::models::DistributorCreate {
            name: name.to_string(),
            phone: None,
        })
        .await
        .expect("create distributor");
    distributor.id.expect("distributor id")
}

async fn seed_order(
    db: &Surreal<Db>,
    distributor: Option<surrealdb::RecordId>,
    items: Vec<OrderItem>,
    placed_by: Actor,
) -> Order {
    let repo = OrderRepository::new(db.clone());
    repo.create(Order {
        id: None,
        placed_by,
        distributor,
        order_date: "2099-01-01".to_string(),
        delivery_date: None,
        status: OrderStatus::Pending,
        locked: false,
        items,
        damaged_products: Vec::new(),
        total_damaged_cost: 0,
        final_bill_amount: None,
        customer_phone: None,
        updated_by: None,
        created_at: 0,
        updated_at: 0,
    })
    .await
    .expect("create order")
}

fn tubs(product: &surrealdb::RecordId, quantity: i64) -> OrderItem {
    OrderItem {
        product: product.clone(),
        quantity,
        unit: "tubs".to_string(),
    }
}

async fn wallet_balance(db: &Surreal<Db>, distributor: &surrealdb::RecordId) -> i64 {
    DistributorRepository::new(db.clone())
        .find_by_id(&distributor.to_string())
        .await
        .expect("find distributor")
        .expect("distributor exists")
        .wallet_balance
}

#[tokio::test]
async fn settlement_locks_order_and_bill_and_credits_wallet() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), Some(10), Some(10)).await;
    let distributor = seed_distributor(&db, "North Dairy").await;
    let order = seed_order(&db, Some(distributor.clone()), vec![tubs(&milk, 2)], admin()).await;
    let order_id = order.id.unwrap().to_string();

    let engine = SettlementEngine::new(db.clone());
    let damaged = [DamagedProductInput {
        product_id: milk.to_string(),
        damaged_quantity: 2,
    }];
    let settlement = engine
        .settle_delivery(&order_id, &damaged, admin())
        .await
        .expect("settlement succeeds");

    // 2 tubs at 100 minus 2 damaged packets at 10
    assert_eq!(settlement.original_bill_amount, 200);
    assert_eq!(settlement.total_damaged_cost, 20);
    assert_eq!(settlement.final_bill_amount, 180);
    assert_eq!(settlement.credited_amount, 180);
    assert_eq!(settlement.wallet_balance, 180);
    assert!(settlement.bill_generated);
    assert_eq!(settlement.damaged_products.len(), 1);
    assert_eq!(settlement.damaged_products[0].packets, 2);
    assert_eq!(settlement.damaged_products[0].price_per_packet, 10);
    assert_eq!(settlement.damaged_products[0].line_total, 20);

    let order = OrderRepository::new(db.clone())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.locked);
    assert_eq!(order.final_bill_amount, Some(180));
    assert_eq!(order.total_damaged_cost, 20);
    assert!(order.delivery_date.is_some());

    let bill = BillRepository::new(db.clone())
        .find_by_order(&order.id.unwrap())
        .await
        .unwrap()
        .expect("bill exists");
    assert!(bill.locked);
    assert_eq!(bill.status, BillStatus::Completed);
    assert_eq!(bill.total_amount, 180);
    assert_eq!(bill.bill_number, settlement.bill_number);

    assert_eq!(wallet_balance(&db, &distributor).await, 180);
}

#[tokio::test]
async fn repeat_settlement_is_rejected_and_credits_once() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), None, None).await;
    let distributor = seed_distributor(&db, "North Dairy").await;
    let order = seed_order(&db, Some(distributor.clone()), vec![tubs(&milk, 1)], admin()).await;
    let order_id = order.id.unwrap().to_string();

    let engine = SettlementEngine::new(db.clone());
    engine
        .settle_delivery(&order_id, &[], admin())
        .await
        .expect("first settlement succeeds");

    let err = engine
        .settle_delivery(&order_id, &[], admin())
        .await
        .expect_err("second settlement rejected");
    assert!(matches!(err, AppError::AlreadySettled(_)));

    assert_eq!(wallet_balance(&db, &distributor).await, 100);
}

#[tokio::test]
async fn concurrent_settlements_credit_exactly_once() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), None, None).await;
    let distributor = seed_distributor(&db, "North Dairy").await;
    let order = seed_order(&db, Some(distributor.clone()), vec![tubs(&milk, 3)], admin()).await;
    let order_id = order.id.unwrap().to_string();

    let engine_a = SettlementEngine::new(db.clone());
    let engine_b = SettlementEngine::new(db.clone());
    let (a, b) = tokio::join!(
        engine_a.settle_delivery(&order_id, &[], admin()),
        engine_b.settle_delivery(&order_id, &[], staff("staff:raju", "Raju")),
    );

    // Exactly one request wins the claim; the loser is classified as a
    // detected race whether it lost at the bill create, the claim, or a
    // storage-level commit conflict.
    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one settlement must win");
    for result in [a, b] {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    AppError::AlreadySettled(_) | AppError::ConcurrentModification(_)
                ),
                "loser must surface as a race, got: {err}"
            );
        }
    }

    assert_eq!(wallet_balance(&db, &distributor).await, 300);
}

#[tokio::test]
async fn settlement_guards_reject_incomplete_orders() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), None, None).await;
    let distributor = seed_distributor(&db, "North Dairy").await;
    let engine = SettlementEngine::new(db.clone());

    // No distributor assigned
    let orphan = seed_order(&db, None, vec![tubs(&milk, 1)], admin()).await;
    let err = engine
        .settle_delivery(&orphan.id.unwrap().to_string(), &[], admin())
        .await
        .expect_err("no distributor");
    assert!(matches!(err, AppError::InvalidState(_)));

    // No items
    let empty = seed_order(&db, Some(distributor.clone()), Vec::new(), admin()).await;
    let err = engine
        .settle_delivery(&empty.id.unwrap().to_string(), &[], admin())
        .await
        .expect_err("no items");
    assert!(matches!(err, AppError::InvalidState(_)));

    // Unknown order
    let err = engine
        .settle_delivery("order:doesnotexist", &[], admin())
        .await
        .expect_err("missing order");
    assert!(matches!(err, AppError::NotFound(_)));

    // Negative damaged quantity
    let order = seed_order(&db, Some(distributor.clone()), vec![tubs(&milk, 1)], admin()).await;
    let order_id = order.id.unwrap().to_string();
    let err = engine
        .settle_delivery(
            &order_id,
            &[DamagedProductInput {
                product_id: milk.to_string(),
                damaged_quantity: -1,
            }],
            admin(),
        )
        .await
        .expect_err("negative damage");
    assert!(matches!(err, AppError::Validation(_)));

    // Absurd damaged quantity
    let err = engine
        .settle_delivery(
            &order_id,
            &[DamagedProductInput {
                product_id: milk.to_string(),
                damaged_quantity: i64::MAX,
            }],
            admin(),
        )
        .await
        .expect_err("oversized damage");
    assert!(matches!(err, AppError::Validation(_)));

    // None of the rejected attempts touched the wallet
    assert_eq!(wallet_balance(&db, &distributor).await, 0);
}

#[tokio::test]
async fn fully_damaged_order_settles_at_zero() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), Some(10), Some(10)).await;
    let distributor = seed_distributor(&db, "North Dairy").await;
    let order = seed_order(&db, Some(distributor.clone()), vec![tubs(&milk, 1)], admin()).await;
    let order_id = order.id.unwrap().to_string();

    let engine = SettlementEngine::new(db.clone());
    let settlement = engine
        .settle_delivery(
            &order_id,
            &[DamagedProductInput {
                product_id: milk.to_string(),
                damaged_quantity: 50,
            }],
            admin(),
        )
        .await
        .expect("settlement succeeds at zero");

    assert_eq!(settlement.original_bill_amount, 100);
    assert_eq!(settlement.total_damaged_cost, 500);
    assert_eq!(settlement.final_bill_amount, 0);
    assert_eq!(settlement.credited_amount, 0);
    assert_eq!(settlement.wallet_balance, 0);

    let order = OrderRepository::new(db.clone())
        .find_by_id(&order_id)
        .await
        .unwrap()
        .unwrap();
    assert!(order.locked);
    assert_eq!(wallet_balance(&db, &distributor).await, 0);
}

#[tokio::test]
async fn locked_order_rejects_update_and_delete() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), None, None).await;
    let distributor = seed_distributor(&db, "North Dairy").await;
    let order = seed_order(&db, Some(distributor.clone()), vec![tubs(&milk, 1)], admin()).await;
    let order_id = order.id.unwrap().to_string();

    SettlementEngine::new(db.clone())
        .settle_delivery(&order_id, &[], admin())
        .await
        .expect("settlement succeeds");

    let repo = OrderRepository::new(db.clone());
    let err = repo
        .update_unlocked(
            &order_id,
            milksync_server::db::models::OrderUpdateData {
                order_date: Some("2099-02-01".to_string()),
                items: None,
                customer_phone: None,
                updated_by: admin(),
                updated_at: 1,
            },
        )
        .await
        .expect_err("update rejected");
    assert!(matches!(err, RepoError::Locked(_)));

    let err = repo.delete_unlocked(&order_id).await.expect_err("delete rejected");
    assert!(matches!(err, RepoError::Locked(_)));

    // The settled snapshot is intact
    let order = repo.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(order.order_date, "2099-01-01");
}

#[tokio::test]
async fn preview_then_settle_reuses_the_same_bill() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), None, None).await;
    let distributor = seed_distributor(&db, "North Dairy").await;
    let order = seed_order(&db, Some(distributor.clone()), vec![tubs(&milk, 2)], admin()).await;
    let order_id = order.id.unwrap().to_string();

    let engine = SettlementEngine::new(db.clone());
    let (preview, created) = engine
        .preview_bill(&order_id, admin())
        .await
        .expect("preview creates the bill");
    assert!(created);
    assert_eq!(preview.total_amount, 200);
    assert!(!preview.locked);

    // Previewing again recomputes instead of duplicating
    let (second, created) = engine
        .preview_bill(&order_id, admin())
        .await
        .expect("preview recomputes");
    assert!(!created);
    assert_eq!(second.bill_number, preview.bill_number);

    let settlement = engine
        .settle_delivery(&order_id, &[], admin())
        .await
        .expect("settlement succeeds");
    assert!(!settlement.bill_generated);
    assert_eq!(settlement.bill_number, preview.bill_number);

    // Still exactly one bill for the order, now locked
    let bills = BillRepository::new(db.clone()).find_all(10, 0).await.unwrap();
    assert_eq!(bills.len(), 1);
    assert!(bills[0].locked);

    // A locked bill can no longer be recomputed
    let err = engine
        .preview_bill(&order_id, admin())
        .await
        .expect_err("locked bill");
    assert!(matches!(err, AppError::AlreadySettled(_)));
}

#[tokio::test]
async fn wallet_balances_sum_over_settlements_and_debits() {
    let db = test_db().await;
    let milk = seed_product(&db, "Toned Milk", Some(100), None, None).await;
    let curd = seed_product(&db, "Curd", None, Some(10), Some(5)).await;
    let distributor = seed_distributor(&db, "North Dairy").await;

    let engine = SettlementEngine::new(db.clone());
    for items in [
        vec![tubs(&milk, 2)],                 // 200
        vec![tubs(&curd, 3)],                 // 150
        vec![tubs(&milk, 1), tubs(&curd, 1)], // 150
    ] {
        let order = seed_order(&db, Some(distributor.clone()), items, admin()).await;
        engine
            .settle_delivery(&order.id.unwrap().to_string(), &[], admin())
            .await
            .expect("settlement succeeds");
    }
    assert_eq!(wallet_balance(&db, &distributor).await, 500);

    // Manual debit within the balance succeeds
    let repo = DistributorRepository::new(db.clone());
    let after = repo
        .debit(&distributor.to_string(), 300)
        .await
        .expect("debit succeeds");
    assert_eq!(after.wallet_balance, 200);

    // Overdrawing is rejected and leaves the balance untouched
    let err = repo
        .debit(&distributor.to_string(), 500)
        .await
        .expect_err("overdraw rejected");
    assert!(matches!(err, RepoError::InsufficientFunds(_)));
    assert_eq!(wallet_balance(&db, &distributor).await, 200);
}
