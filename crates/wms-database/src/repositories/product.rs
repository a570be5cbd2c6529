//! Product repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use wms_core::error::AppError;
use wms_core::result::AppResult;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_entity::product::{CreateProduct, Product, UpdateProduct};

use super::{map_delete_error, map_write_error, read_error};

/// Optional list filters for products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the model code.
    pub model: Option<String>,
    /// Exact category.
    pub category: Option<String>,
}

/// Repository for the product catalog.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a product by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find product"))
    }

    /// List products, newest first.
    pub async fn find_all(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Product>> {
        const WHERE: &str = "WHERE ($1::text IS NULL OR model ILIKE '%' || $1 || '%') \
             AND ($2::text IS NULL OR category = $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products {WHERE}"))
            .bind(filter.model.as_deref())
            .bind(filter.category.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to count products"))?;

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT * FROM products {WHERE} ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.model.as_deref())
        .bind(filter.category.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list products"))?;

        Ok(PageResponse::new(products, page, total as u64))
    }

    /// Create a product.
    pub async fn create(&self, data: &CreateProduct) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, model, description, category, warranty_months, price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.model)
        .bind(data.description.as_deref())
        .bind(data.category.as_deref())
        .bind(data.warranty_months)
        .bind(data.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create product", &[]))
    }

    /// Update a product.
    pub async fn update(&self, id: Uuid, data: &UpdateProduct) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET name = COALESCE($2, name), \
                                 model = COALESCE($3, model), \
                                 description = COALESCE($4, description), \
                                 category = COALESCE($5, category), \
                                 warranty_months = COALESCE($6, warranty_months), \
                                 price = COALESCE($7, price), \
                                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.name.as_deref())
        .bind(data.model.as_deref())
        .bind(data.description.as_deref())
        .bind(data.category.as_deref())
        .bind(data.warranty_months)
        .bind(data.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update product", &[]))?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    /// Delete a product. Products still referenced by serials or contracts
    /// cannot be deleted.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_delete_error(
                    e,
                    "Failed to delete product",
                    "Product is still referenced by serials or contracts",
                )
            })?;
        Ok(result.rows_affected() > 0)
    }
}
