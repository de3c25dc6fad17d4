//! Order Repository
//!
//! All mutations honor the `locked` gate inside the statement itself:
//! update and delete filter on `locked = false`, and the delivery claim is a
//! single compare-and-set that flips `status`/`locked` together. Application
//! code never re-checks a stale read to decide whether a write is allowed.

use shared::{Actor, Cents};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{DamagedProduct, Order, OrderUpdateData};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Find all orders, newest first (paginated)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("table", TABLE))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = Self::record_id(id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Create a new order (always allowed; orders start pending/unlocked)
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Update an order, rejecting locked records
    ///
    /// The lock check lives in the WHERE clause; a settlement that lands
    /// between our read and this write still causes the update to miss.
    pub async fn update_unlocked(&self, id: &str, data: OrderUpdateData) -> RepoResult<Order> {
        let record_id = Self::record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id MERGE $data WHERE locked = false RETURN AFTER")
            .bind(("id", record_id))
            .bind(("data", data))
            .await?;
        let updated: Vec<Order> = result.take(0)?;

        match updated.into_iter().next() {
            Some(order) => Ok(order),
            None => Err(self.missing_or_locked(id).await?),
        }
    }

    /// Delete an order, rejecting locked records
    pub async fn delete_unlocked(&self, id: &str) -> RepoResult<Order> {
        let record_id = Self::record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("DELETE $id WHERE locked = false RETURN BEFORE")
            .bind(("id", record_id))
            .await?;
        let deleted: Vec<Order> = result.take(0)?;

        match deleted.into_iter().next() {
            Some(order) => Ok(order),
            None => Err(self.missing_or_locked(id).await?),
        }
    }

    /// Atomically claim an order for delivery
    ///
    /// Single conditional update that transitions pending/unlocked →
    /// delivered/locked and stamps the settlement results. Returns `None`
    /// when the order was already claimed (or does not exist) — the caller
    /// decides between `AlreadySettled` and `ConcurrentModification` based
    /// on what it observed before the claim.
    #[allow(clippy::too_many_arguments)]
    pub async fn claim_delivery(
        &self,
        id: &str,
        delivery_date: String,
        damaged_products: Vec<DamagedProduct>,
        total_damaged_cost: Cents,
        final_bill_amount: Cents,
        updated_by: Actor,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        let record_id = Self::record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"
                UPDATE $id SET
                    status = 'delivered',
                    locked = true,
                    delivery_date = $delivery_date,
                    damaged_products = $damaged_products,
                    total_damaged_cost = $total_damaged_cost,
                    final_bill_amount = $final_bill_amount,
                    updated_by = $updated_by,
                    updated_at = $now
                WHERE status = 'pending' AND locked = false
                RETURN AFTER
                "#,
            )
            .bind(("id", record_id))
            .bind(("delivery_date", delivery_date))
            .bind(("damaged_products", damaged_products))
            .bind(("total_damaged_cost", total_damaged_cost))
            .bind(("final_bill_amount", final_bill_amount))
            .bind(("updated_by", updated_by))
            .bind(("now", now))
            .await?;
        let claimed: Vec<Order> = result.take(0)?;
        Ok(claimed.into_iter().next())
    }

    /// Distinguish a missed conditional write: locked record vs missing record
    async fn missing_or_locked(&self, id: &str) -> RepoResult<RepoError> {
        Ok(match self.find_by_id(id).await? {
            Some(_) => RepoError::Locked(format!("Order {} is locked", id)),
            None => RepoError::NotFound(format!("Order {} not found", id)),
        })
    }
}
