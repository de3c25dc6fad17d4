//! Distributor Model
//!
//! `wallet_balance` only ever changes through the atomic credit/debit
//! statements in the distributor repository; nothing loads, mutates and
//! saves the balance in memory.

use serde::{Deserialize, Serialize};
use shared::Cents;
use surrealdb::RecordId;

use super::serde_helpers;

/// Distributor entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distributor {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub phone: Option<String>,
    /// Signed balance in cents; credited on each settlement
    #[serde(default)]
    pub wallet_balance: Cents,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorCreate {
    pub name: String,
    pub phone: Option<String>,
}

/// Partial update; absent fields are left untouched by the MERGE
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
