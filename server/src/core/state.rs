use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Server state - shared handle to configuration and the database
///
/// Cloning is cheap: the SurrealDB handle is internally reference counted.
/// Handlers construct repositories from `state.db` per request, matching
/// the repository-per-call pattern used throughout `api/`.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self { config, db }
    }

    /// Initialize server state: ensure the work directory exists, open the
    /// embedded database and apply schema definitions
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = db_dir.join("milksync.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// In-memory state for tests
    pub async fn initialize_in_memory(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::memory().await?;
        Ok(Self::new(config.clone(), db_service.db))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
