//! Settlement engine
//!
//! Orchestrates delivery settlement: validate the order, compute the bill,
//! write it, then take the atomic delivery claim and credit the wallet.
//! The claim is the linearization point — until it succeeds nothing
//! irreversible has happened (an unlocked bill can always be recomputed),
//! and after it succeeds exactly one request proceeds to the credit.

use std::collections::HashMap;

use shared::request::DamagedProductInput;
use shared::response::{DamagedLine, SettlementResponse};
use shared::{Actor, Cents};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{error, info};

use crate::db::models::{Bill, BillDraft, Product};
use crate::db::repository::{
    BillRepository, DistributorRepository, OrderRepository, ProductRepository, RepoError,
};
use crate::settlement::compute::{DamagedDeclaration, compute_bill};
use crate::utils::time::{now_millis, today};
use crate::utils::validation::MAX_QUANTITY;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct SettlementEngine {
    orders: OrderRepository,
    bills: BillRepository,
    products: ProductRepository,
    distributors: DistributorRepository,
}

impl SettlementEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            bills: BillRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            distributors: DistributorRepository::new(db),
        }
    }

    /// Settle a delivery
    ///
    /// On success the order is `delivered`/locked, its bill is locked, and
    /// the distributor wallet has been credited the final bill amount.
    /// Exactly one concurrent caller can succeed per order; losers get
    /// `ConcurrentModification`, repeat calls get `AlreadySettled`.
    pub async fn settle_delivery(
        &self,
        order_id: &str,
        damaged: &[DamagedProductInput],
        actor: Actor,
    ) -> AppResult<SettlementResponse> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

        if order.is_settled() {
            return Err(AppError::AlreadySettled(format!(
                "Order {} has already been delivered",
                order_id
            )));
        }
        let Some(distributor_id) = order.distributor.clone() else {
            return Err(AppError::invalid_state(format!(
                "Order {} has no distributor assigned",
                order_id
            )));
        };
        if order.items.is_empty() {
            return Err(AppError::invalid_state(format!(
                "Order {} has no items",
                order_id
            )));
        }

        let declarations = parse_damaged(damaged)?;
        let product_map = self
            .resolve_products(&order, &declarations)
            .await?;

        let computation = compute_bill(&order.items, &declarations, &product_map);
        let billing_date = today().to_string();
        let now = now_millis();

        // Write the bill while the order is still unlocked; if we lose the
        // claim below, the bill is still unlocked and the winner's
        // recomputation overwrites it.
        let draft = BillDraft {
            distributor: distributor_id.clone(),
            order_id: order
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Order record missing id"))?,
            billing_date: billing_date.clone(),
            items: computation.items.clone(),
            damaged_items: computation.damaged_items.clone(),
            subtotal: computation.subtotal,
            total_damaged_cost: computation.total_damaged_cost,
            total_amount: computation.total_amount,
            updated_by: actor.clone(),
        };
        let (bill, bill_generated) =
            self.bills
                .upsert_for_order(draft, now)
                .await
                .map_err(|e| match e {
                    RepoError::Locked(msg) => AppError::AlreadySettled(msg),
                    // A concurrent settlement created the bill first
                    RepoError::Duplicate(msg) => AppError::ConcurrentModification(msg),
                    other => other.into(),
                })?;

        // The claim: pending/unlocked → delivered/locked, atomically.
        let claimed = self
            .orders
            .claim_delivery(
                order_id,
                billing_date,
                computation.damaged_products.clone(),
                computation.total_damaged_cost,
                computation.total_amount,
                actor.clone(),
                now,
            )
            .await?;
        if claimed.is_none() {
            return Err(AppError::ConcurrentModification(format!(
                "Order {} was settled by a concurrent request",
                order_id
            )));
        }

        // Past the claim; any failure below leaves settled state without a
        // locked bill or credited wallet, so log loudly before surfacing.
        let bill = self.lock_bill(order_id, bill, now).await?;
        let wallet_balance = self
            .credit_wallet(order_id, &distributor_id, computation.total_amount)
            .await?;

        info!(
            target: "settlement",
            order = %order_id,
            bill = %bill.bill_number,
            amount = computation.total_amount,
            "Delivery settled"
        );

        Ok(SettlementResponse {
            order_id: order_id.to_string(),
            bill_id: bill
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            bill_number: bill.bill_number,
            bill_generated,
            credited_amount: computation.total_amount,
            wallet_balance,
            damaged_products: damaged_lines(
                &computation.damaged_products,
                &computation.damaged_items,
            ),
            total_damaged_cost: computation.total_damaged_cost,
            original_bill_amount: computation.subtotal,
            final_bill_amount: computation.total_amount,
            updated_by: actor,
            updated_at: now,
        })
    }

    /// Create or recompute the bill for an order without settling it
    ///
    /// Shares the computation and write path with [`settle_delivery`] but
    /// never locks anything and never touches the wallet.
    ///
    /// [`settle_delivery`]: SettlementEngine::settle_delivery
    pub async fn preview_bill(&self, order_id: &str, actor: Actor) -> AppResult<(Bill, bool)> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

        let Some(distributor_id) = order.distributor.clone() else {
            return Err(AppError::invalid_state(format!(
                "Order {} has no distributor assigned",
                order_id
            )));
        };
        if order.items.is_empty() {
            return Err(AppError::invalid_state(format!(
                "Order {} has no items",
                order_id
            )));
        }

        // Recompute from the stamped damaged products so a preview after
        // settlement (of a not-yet-locked bill) matches the settled totals.
        let declarations: Vec<DamagedDeclaration> = order
            .damaged_products
            .iter()
            .map(|d| DamagedDeclaration {
                product: d.product.clone(),
                packets: d.damaged_quantity,
            })
            .collect();
        let product_map = self.resolve_products(&order, &declarations).await?;
        let computation = compute_bill(&order.items, &declarations, &product_map);

        let draft = BillDraft {
            distributor: distributor_id,
            order_id: order
                .id
                .clone()
                .ok_or_else(|| AppError::internal("Order record missing id"))?,
            billing_date: today().to_string(),
            items: computation.items,
            damaged_items: computation.damaged_items,
            subtotal: computation.subtotal,
            total_damaged_cost: computation.total_damaged_cost,
            total_amount: computation.total_amount,
            updated_by: actor,
        };
        self.bills
            .upsert_for_order(draft, now_millis())
            .await
            .map_err(|e| match e {
                RepoError::Locked(msg) => AppError::AlreadySettled(msg),
                RepoError::Duplicate(msg) => AppError::ConcurrentModification(msg),
                other => other.into(),
            })
    }

    /// Batch-load every product referenced by items or damaged declarations
    async fn resolve_products(
        &self,
        order: &crate::db::models::Order,
        declarations: &[DamagedDeclaration],
    ) -> AppResult<HashMap<String, Product>> {
        let mut ids: Vec<surrealdb::RecordId> = order
            .items
            .iter()
            .map(|i| i.product.clone())
            .chain(declarations.iter().map(|d| d.product.clone()))
            .collect();
        ids.sort_by_key(|id| id.to_string());
        ids.dedup_by_key(|id| id.to_string());

        let products = self.products.find_by_ids(ids).await?;
        Ok(products
            .into_iter()
            .filter_map(|p| p.id.clone().map(|id| (id.to_string(), p)))
            .collect())
    }

    async fn lock_bill(&self, order_id: &str, bill: Bill, now: i64) -> AppResult<Bill> {
        let bill_id = bill
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Bill record missing id"))?;
        match self.bills.lock(&bill_id, now).await {
            Ok(Some(locked)) => Ok(locked),
            Ok(None) => {
                error!(
                    target: "settlement",
                    order = %order_id,
                    bill = %bill.bill_number,
                    "Inconsistent state: order claimed but its bill was already locked"
                );
                Err(AppError::database(format!(
                    "Bill for order {} could not be locked",
                    order_id
                )))
            }
            Err(e) => {
                error!(
                    target: "settlement",
                    order = %order_id,
                    bill = %bill.bill_number,
                    error = %e,
                    "Inconsistent state: order claimed but bill lock failed"
                );
                Err(e.into())
            }
        }
    }

    async fn credit_wallet(
        &self,
        order_id: &str,
        distributor_id: &surrealdb::RecordId,
        amount: Cents,
    ) -> AppResult<Cents> {
        // A fully damaged order settles at zero; nothing to credit.
        if amount == 0 {
            let distributor = self
                .distributors
                .find_by_id(&distributor_id.to_string())
                .await?
                .ok_or_else(|| {
                    error!(
                        target: "settlement",
                        order = %order_id,
                        distributor = %distributor_id,
                        "Inconsistent state: order claimed but distributor is missing"
                    );
                    AppError::database(format!(
                        "Distributor for order {} not found after claim",
                        order_id
                    ))
                })?;
            return Ok(distributor.wallet_balance);
        }

        match self
            .distributors
            .credit(&distributor_id.to_string(), amount)
            .await
        {
            Ok(distributor) => Ok(distributor.wallet_balance),
            Err(e) => {
                error!(
                    target: "settlement",
                    order = %order_id,
                    distributor = %distributor_id,
                    amount,
                    error = %e,
                    "Inconsistent state: order claimed but wallet credit failed"
                );
                Err(e.into())
            }
        }
    }
}

/// Parse wire damaged-product entries into resolved declarations
///
/// Negative quantities are rejected, quantities above [`MAX_QUANTITY`] are
/// rejected, and zero quantities are dropped here so the computation only
/// sees effective declarations.
fn parse_damaged(damaged: &[DamagedProductInput]) -> AppResult<Vec<DamagedDeclaration>> {
    let mut declarations = Vec::with_capacity(damaged.len());
    for entry in damaged {
        if entry.damaged_quantity < 0 {
            return Err(AppError::validation(format!(
                "Damaged quantity for product {} cannot be negative",
                entry.product_id
            )));
        }
        if entry.damaged_quantity > MAX_QUANTITY {
            return Err(AppError::validation(format!(
                "Damaged quantity for product {} exceeds the limit of {}",
                entry.product_id, MAX_QUANTITY
            )));
        }
        if entry.damaged_quantity == 0 {
            continue;
        }
        let product = ProductRepository::record_id(&entry.product_id)?;
        declarations.push(DamagedDeclaration {
            product,
            packets: entry.damaged_quantity,
        });
    }
    Ok(declarations)
}

/// Build response lines from the computation's parallel damaged vectors
fn damaged_lines(
    stamps: &[crate::db::models::DamagedProduct],
    items: &[crate::db::models::DamagedBillItem],
) -> Vec<DamagedLine> {
    stamps
        .iter()
        .zip(items)
        .map(|(stamp, line)| DamagedLine {
            product_id: stamp.product.to_string(),
            product_name: stamp.product_name.clone(),
            packets: stamp.damaged_quantity,
            price_per_packet: line.price_per_packet,
            line_total: line.line_total,
        })
        .collect()
}
