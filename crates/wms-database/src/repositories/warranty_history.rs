//! Warranty history repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_entity::warranty::{
    CreateWarrantyHistory, UpdateWarrantyHistory, WarrantyAction, WarrantyHistory,
};

use super::{map_write_error, read_error};

/// Repository for warranty service events.
#[derive(Debug, Clone)]
pub struct WarrantyHistoryRepository {
    pool: PgPool,
}

impl WarrantyHistoryRepository {
    /// Create a new warranty history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an event.
    pub async fn create(&self, data: &CreateWarrantyHistory) -> AppResult<WarrantyHistory> {
        sqlx::query_as::<_, WarrantyHistory>(
            "INSERT INTO warranty_history (serial_id, action, description, cost, performed_by, performed_at) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW())) RETURNING *",
        )
        .bind(data.serial_id)
        .bind(data.action)
        .bind(&data.description)
        .bind(data.cost)
        .bind(data.performed_by)
        .bind(data.performed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to record warranty history", &[]))
    }

    /// Find an event by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<WarrantyHistory>> {
        sqlx::query_as::<_, WarrantyHistory>("SELECT * FROM warranty_history WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find warranty history"))
    }

    /// List events, most recent first.
    pub async fn find_all(
        &self,
        action: Option<WarrantyAction>,
        page: PageRequest,
    ) -> AppResult<PageResponse<WarrantyHistory>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM warranty_history WHERE ($1::warranty_action IS NULL OR action = $1)",
        )
        .bind(action)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to count warranty history"))?;

        let entries = sqlx::query_as::<_, WarrantyHistory>(
            "SELECT * FROM warranty_history WHERE ($1::warranty_action IS NULL OR action = $1) \
             ORDER BY performed_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(action)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list warranty history"))?;

        Ok(PageResponse::new(entries, page, total as u64))
    }

    /// Events of one serial, most recent first.
    pub async fn find_by_serial(&self, serial_id: Uuid) -> AppResult<Vec<WarrantyHistory>> {
        sqlx::query_as::<_, WarrantyHistory>(
            "SELECT * FROM warranty_history WHERE serial_id = $1 ORDER BY performed_at DESC",
        )
        .bind(serial_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list warranty history by serial"))
    }

    /// Events of several serials, most recent first.
    pub async fn find_by_serials(&self, serial_ids: &[Uuid]) -> AppResult<Vec<WarrantyHistory>> {
        if serial_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, WarrantyHistory>(
            "SELECT * FROM warranty_history WHERE serial_id = ANY($1) ORDER BY performed_at DESC",
        )
        .bind(serial_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list warranty history by serials"))
    }

    /// Update an event.
    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateWarrantyHistory,
    ) -> AppResult<WarrantyHistory> {
        sqlx::query_as::<_, WarrantyHistory>(
            "UPDATE warranty_history SET action = COALESCE($2, action), \
                                         description = COALESCE($3, description), \
                                         cost = COALESCE($4, cost), \
                                         performed_at = COALESCE($5, performed_at) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.action)
        .bind(data.description.as_deref())
        .bind(data.cost)
        .bind(data.performed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update warranty history", &[]))?
        .ok_or_else(|| AppError::not_found(format!("Warranty history {id} not found")))
    }

    /// Delete an event.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM warranty_history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete warranty history", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
