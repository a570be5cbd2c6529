//! Product catalog operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wms_auth::rbac::{Permission, RbacEnforcer};
use wms_core::error::AppError;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_database::repositories::{ProductFilter, ProductRepository, SerialRepository};
use wms_entity::product::{CreateProduct, Product, UpdateProduct};
use wms_entity::serial::Serial;

use crate::context::RequestContext;

/// A product with the serials registered against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    /// The product.
    #[serde(flatten)]
    pub product: Product,
    /// Registered units.
    pub serials: Vec<Serial>,
}

/// Manages the product catalog.
#[derive(Debug, Clone)]
pub struct ProductService {
    product_repo: Arc<ProductRepository>,
    serial_repo: Arc<SerialRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl ProductService {
    /// Creates a new product service.
    pub fn new(
        product_repo: Arc<ProductRepository>,
        serial_repo: Arc<SerialRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            product_repo,
            serial_repo,
            rbac,
        }
    }

    /// Adds a product to the catalog.
    pub async fn create(&self, ctx: &RequestContext, mut data: CreateProduct) -> Result<Product, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::ProductManage)?;

        data.name = required(&data.name, "Product name")?;
        data.model = required(&data.model, "Product model")?;
        check_terms(Some(data.warranty_months), data.price)?;

        let product = self.product_repo.create(&data).await?;
        info!(product_id = %product.id, model = %product.model, "Product created");
        Ok(product)
    }

    /// Lists products, newest first.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Product>, AppError> {
        self.product_repo.find_all(filter, page).await
    }

    /// Gets a product with its serials.
    pub async fn get(&self, id: Uuid) -> Result<ProductDetail, AppError> {
        let product = self.find(id).await?;
        let serials = self.serial_repo.find_by_product(id).await?;
        Ok(ProductDetail { product, serials })
    }

    /// Gets a bare product.
    pub async fn find(&self, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    /// Updates product fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        mut data: UpdateProduct,
    ) -> Result<Product, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::ProductManage)?;

        data.name = data.name.as_deref().map(|n| required(n, "Product name")).transpose()?;
        data.model = data.model.as_deref().map(|m| required(m, "Product model")).transpose()?;
        check_terms(data.warranty_months, data.price)?;

        let product = self.product_repo.update(id, &data).await?;
        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Removes a product that nothing references any more.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.rbac.require_permission(&ctx.role, Permission::ProductManage)?;

        if !self.product_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Product {id} not found")));
        }
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn check_terms(warranty_months: Option<i32>, price: Option<i64>) -> Result<(), AppError> {
    if warranty_months.is_some_and(|m| m < 1) {
        return Err(AppError::validation("Warranty months must be at least 1"));
    }
    if price.is_some_and(|p| p < 0) {
        return Err(AppError::validation("Price must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warranty_terms_are_checked() {
        assert!(check_terms(Some(0), None).is_err());
        assert!(check_terms(Some(12), Some(-1)).is_err());
        assert!(check_terms(Some(12), Some(0)).is_ok());
        assert!(check_terms(None, None).is_ok());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(required("   ", "Product name").is_err());
        assert_eq!(required("  Panel ", "Product name").unwrap(), "Panel");
    }
}
