//! Distributor Repository (Wallet Ledger)
//!
//! Wallet mutations are single `+=`/`-=` statements executed inside the
//! storage engine, never load-balance/mutate/save. Two settlements crediting
//! the same distributor concurrently both land; the final balance is the sum
//! of both credits.

use shared::Cents;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Distributor, DistributorCreate, DistributorUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "distributor";

#[derive(Clone)]
pub struct DistributorRepository {
    base: BaseRepository,
}

impl DistributorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Find all distributors ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Distributor>> {
        let distributors: Vec<Distributor> = self
            .base
            .db()
            .query("SELECT * FROM distributor ORDER BY name")
            .await?
            .take(0)?;
        Ok(distributors)
    }

    /// Find distributor by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Distributor>> {
        let record_id = Self::record_id(id)?;
        let distributor: Option<Distributor> = self.base.db().select(record_id).await?;
        Ok(distributor)
    }

    /// Create a new distributor (wallet starts at zero)
    pub async fn create(&self, data: DistributorCreate) -> RepoResult<Distributor> {
        let now = now_millis();
        let distributor = Distributor {
            id: None,
            name: data.name,
            phone: data.phone,
            wallet_balance: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let created: Option<Distributor> =
            self.base.db().create(TABLE).content(distributor).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create distributor".to_string()))
    }

    /// Update distributor profile fields (never the wallet balance)
    pub async fn update(&self, id: &str, data: DistributorUpdate) -> RepoResult<Distributor> {
        let record_id = Self::record_id(id)?;

        #[derive(serde::Serialize)]
        struct Merge {
            #[serde(flatten)]
            data: DistributorUpdate,
            updated_at: i64,
        }

        let mut result = self
            .base
            .db()
            .query("UPDATE $id MERGE $data RETURN AFTER")
            .bind(("id", record_id))
            .bind((
                "data",
                Merge {
                    data,
                    updated_at: now_millis(),
                },
            ))
            .await?;
        let updated: Vec<Distributor> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Distributor {} not found", id)))
    }

    /// Hard delete a distributor
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = Self::record_id(id)?;
        let _deleted: Option<Distributor> = self.base.db().delete(record_id).await?;
        Ok(true)
    }

    /// Atomically credit the wallet
    ///
    /// Returns the distributor with the post-credit balance.
    pub async fn credit(&self, id: &str, amount: Cents) -> RepoResult<Distributor> {
        if amount <= 0 {
            return Err(RepoError::Validation(format!(
                "Credit amount must be positive, got {}",
                amount
            )));
        }
        let record_id = Self::record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET wallet_balance += $amount, updated_at = $now RETURN AFTER")
            .bind(("id", record_id))
            .bind(("amount", amount))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<Distributor> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Distributor {} not found", id)))
    }

    /// Atomically debit the wallet
    ///
    /// The balance check sits in the WHERE clause of the same statement as
    /// the decrement, so a concurrent debit cannot overdraw the wallet.
    pub async fn debit(&self, id: &str, amount: Cents) -> RepoResult<Distributor> {
        if amount <= 0 {
            return Err(RepoError::Validation(format!(
                "Debit amount must be positive, got {}",
                amount
            )));
        }
        let record_id = Self::record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET wallet_balance -= $amount, updated_at = $now \
                 WHERE wallet_balance >= $amount RETURN AFTER",
            )
            .bind(("id", record_id))
            .bind(("amount", amount))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<Distributor> = result.take(0)?;

        match updated.into_iter().next() {
            Some(distributor) => Ok(distributor),
            None => match self.find_by_id(id).await? {
                Some(d) => Err(RepoError::InsufficientFunds(format!(
                    "Balance {} is less than debit amount {}",
                    d.wallet_balance, amount
                ))),
                None => Err(RepoError::NotFound(format!(
                    "Distributor {} not found",
                    id
                ))),
            },
        }
    }
}
