//! Product Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::time::now_millis;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Find all products ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record_id = Self::record_id(id)?;
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Batch fetch by record id (settlement resolves all line items at once)
    pub async fn find_by_ids(&self, ids: Vec<RecordId>) -> RepoResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE id IN $ids")
            .bind(("ids", ids))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products)
    }

    /// Find product by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        // Check duplicate name
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let product = Product {
            id: None,
            name: data.name,
            unit: data.unit.unwrap_or_else(|| "tubs".to_string()),
            cost_per_tub: data.cost_per_tub,
            cost_per_packet: data.cost_per_packet,
            packets_per_tub: data.packets_per_tub,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record_id = Self::record_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                new_name
            )));
        }

        #[derive(serde::Serialize)]
        struct Merge {
            #[serde(flatten)]
            data: ProductUpdate,
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
        let updated: Vec<Product> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = Self::record_id(id)?;
        let _deleted: Option<Product> = self.base.db().delete(record_id).await?;
        Ok(true)
    }
}
