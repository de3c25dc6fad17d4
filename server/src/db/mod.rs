//! Database Module
//!
//! Embedded SurrealDB connection and schema definitions.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "milksync";
const DATABASE: &str = "milksync";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let service = Self::finish_init(db).await?;
        tracing::info!(path = db_path, "Database connection established");
        Ok(service)
    }

    /// In-memory database for tests
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::finish_init(db).await
    }

    async fn finish_init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Apply schema definitions (idempotent)
///
/// Bills are unique per order (upsert key) and per bill number.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS uniq_bill_order ON TABLE bill COLUMNS order_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS uniq_bill_number ON TABLE bill COLUMNS bill_number UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to apply schema definitions: {e}")))?;
    Ok(())
}
