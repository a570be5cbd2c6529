//! Product entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A product model sold under warranty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    /// Unique product identifier.
    pub id: Uuid,
    /// Commercial name.
    pub name: String,
    /// Manufacturer model code.
    pub model: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Catalog category.
    pub category: Option<String>,
    /// Warranty length granted to each unit, in calendar months.
    pub warranty_months: i32,
    /// List price in the smallest currency unit.
    pub price: Option<i64>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Reduce to the summary embedded in serial and contract payloads.
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            model: self.model.clone(),
            warranty_months: self.warranty_months,
        }
    }
}

/// Minimal product view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductSummary {
    /// Product ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Model code.
    pub model: String,
    /// Warranty length in months.
    pub warranty_months: i32,
}

/// Data required to create a product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    /// Name.
    pub name: String,
    /// Model code.
    pub model: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Warranty length in months.
    pub warranty_months: i32,
    /// Price.
    pub price: Option<i64>,
}

/// Partial update of a product; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    /// Name.
    pub name: Option<String>,
    /// Model code.
    pub model: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Warranty length in months.
    pub warranty_months: Option<i32>,
    /// Price.
    pub price: Option<i64>,
}
