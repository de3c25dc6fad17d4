//! Bill Repository
//!
//! Bills are keyed 1:1 to orders (unique `order_id` index); creation goes
//! through upsert semantics so the preview endpoint and the settlement
//! engine share one write path. A locked bill is immutable.

use serde::Serialize;
use shared::{Actor, BillStatus, Cents};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::bill::generate_bill_number;
use crate::db::models::{Bill, BillDraft, BillItem, DamagedBillItem};

const TABLE: &str = "bill";

/// Recomputed fields merged into an existing unlocked bill
#[derive(Debug, Serialize)]
struct BillRecompute {
    billing_date: String,
    items: Vec<BillItem>,
    damaged_items: Vec<DamagedBillItem>,
    subtotal: Cents,
    total_damaged_cost: Cents,
    total_amount: Cents,
    updated_by: Actor,
    updated_at: i64,
}

#[derive(Clone)]
pub struct BillRepository {
    base: BaseRepository,
}

impl BillRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Find all bills, newest first (paginated)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Bill>> {
        let bills: Vec<Bill> = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("table", TABLE))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(bills)
    }

    /// Find bill by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Bill>> {
        let record_id = Self::record_id(id)?;
        let bill: Option<Bill> = self.base.db().select(record_id).await?;
        Ok(bill)
    }

    /// Find the bill for an order (at most one exists)
    ///
    /// Record links are stored in their `table:id` string form, so the
    /// lookup binds the string representation.
    pub async fn find_by_order(&self, order_id: &RecordId) -> RepoResult<Option<Bill>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM bill WHERE order_id = $order_id LIMIT 1")
            .bind(("order_id", order_id.to_string()))
            .await?;
        let bills: Vec<Bill> = result.take(0)?;
        Ok(bills.into_iter().next())
    }

    /// Create-or-recompute the bill for an order
    ///
    /// - no bill yet: create one with a fresh bill number
    /// - unlocked bill: overwrite the computed fields (idempotent for
    ///   identical inputs)
    /// - locked bill: reject — the order has already been settled
    ///
    /// Returns the bill and whether it was newly created.
    pub async fn upsert_for_order(&self, draft: BillDraft, now: i64) -> RepoResult<(Bill, bool)> {
        match self.find_by_order(&draft.order_id).await? {
            None => {
                let order_id = draft.order_id.clone();
                let bill = Bill {
                    id: None,
                    bill_number: generate_bill_number(),
                    distributor: draft.distributor,
                    order_id: draft.order_id,
                    billing_date: draft.billing_date,
                    items: draft.items,
                    damaged_items: draft.damaged_items,
                    subtotal: draft.subtotal,
                    total_damaged_cost: draft.total_damaged_cost,
                    total_amount: draft.total_amount,
                    status: BillStatus::Pending,
                    locked: false,
                    updated_by: Some(draft.updated_by),
                    created_at: now,
                    updated_at: now,
                };
                let created: Result<Option<Bill>, surrealdb::Error> =
                    self.base.db().create(TABLE).content(bill).await;
                match created {
                    Ok(Some(created)) => Ok((created, true)),
                    Ok(None) => Err(RepoError::Database("Failed to create bill".to_string())),
                    // The unique order index rejected our insert; if a bill
                    // now exists, a concurrent writer created it between our
                    // read and this create.
                    Err(e) => match self.find_by_order(&order_id).await? {
                        Some(existing) => Err(RepoError::Duplicate(format!(
                            "Bill {} already exists for order {}",
                            existing.bill_number, order_id
                        ))),
                        None => Err(e.into()),
                    },
                }
            }
            Some(existing) if existing.locked => Err(RepoError::Locked(format!(
                "Bill {} is locked",
                existing.bill_number
            ))),
            Some(existing) => {
                let id = existing.id.clone().ok_or_else(|| {
                    RepoError::Database("Bill record missing id".to_string())
                })?;
                let recompute = BillRecompute {
                    billing_date: draft.billing_date,
                    items: draft.items,
                    damaged_items: draft.damaged_items,
                    subtotal: draft.subtotal,
                    total_damaged_cost: draft.total_damaged_cost,
                    total_amount: draft.total_amount,
                    updated_by: draft.updated_by,
                    updated_at: now,
                };
                let mut result = self
                    .base
                    .db()
                    .query("UPDATE $id MERGE $data WHERE locked = false RETURN AFTER")
                    .bind(("id", id))
                    .bind(("data", recompute))
                    .await?;
                let updated: Vec<Bill> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .map(|bill| (bill, false))
                    // The bill locked between our read and this write
                    .ok_or_else(|| {
                        RepoError::Locked(format!("Bill {} is locked", existing.bill_number))
                    })
            }
        }
    }

    /// Lock a bill and mark it completed
    ///
    /// Conditional on `locked = false`; returns `None` when the bill was
    /// already locked.
    pub async fn lock(&self, id: &RecordId, now: i64) -> RepoResult<Option<Bill>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET locked = true, status = 'completed', updated_at = $now \
                 WHERE locked = false RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("now", now))
            .await?;
        let locked: Vec<Bill> = result.take(0)?;
        Ok(locked.into_iter().next())
    }
}
