//! Serial repository implementation.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_entity::serial::{CreateSerial, Serial, UpdateSerial, WarrantyStatus};
use wms_entity::warranty::WarrantyAction;

use super::{begin, commit, map_delete_error, map_write_error, read_error};

const NUMBER_CONFLICT: &[(&str, &str)] =
    &[("serials_serial_number_key", "Serial number already exists")];

/// Optional list filters for serials.
#[derive(Debug, Clone, Default)]
pub struct SerialFilter {
    /// Restrict to one stored warranty status.
    pub status: Option<WarrantyStatus>,
    /// Restrict to one product.
    pub product_id: Option<Uuid>,
    /// Restrict to one contract.
    pub contract_id: Option<Uuid>,
}

/// Repository for tracked product units.
#[derive(Debug, Clone)]
pub struct SerialRepository {
    pool: PgPool,
}

impl SerialRepository {
    /// Create a new serial repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a serial by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Serial>> {
        sqlx::query_as::<_, Serial>("SELECT * FROM serials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find serial"))
    }

    /// Find a serial by its serial number.
    pub async fn find_by_number(&self, serial_number: &str) -> AppResult<Option<Serial>> {
        sqlx::query_as::<_, Serial>("SELECT * FROM serials WHERE serial_number = $1")
            .bind(serial_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find serial by number"))
    }

    /// List serials, newest first.
    pub async fn find_all(
        &self,
        filter: &SerialFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Serial>> {
        const WHERE: &str = "WHERE ($1::warranty_status IS NULL OR warranty_status = $1) \
             AND ($2::uuid IS NULL OR product_id = $2) \
             AND ($3::uuid IS NULL OR contract_id = $3)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM serials {WHERE}"))
            .bind(filter.status)
            .bind(filter.product_id)
            .bind(filter.contract_id)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to count serials"))?;

        let serials = sqlx::query_as::<_, Serial>(&format!(
            "SELECT * FROM serials {WHERE} ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.status)
        .bind(filter.product_id)
        .bind(filter.contract_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list serials"))?;

        Ok(PageResponse::new(serials, page, total as u64))
    }

    /// All serials of a product.
    pub async fn find_by_product(&self, product_id: Uuid) -> AppResult<Vec<Serial>> {
        sqlx::query_as::<_, Serial>(
            "SELECT * FROM serials WHERE product_id = $1 ORDER BY created_at DESC",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list serials by product"))
    }

    /// All serials covered by a contract.
    pub async fn find_by_contract(&self, contract_id: Uuid) -> AppResult<Vec<Serial>> {
        sqlx::query_as::<_, Serial>(
            "SELECT * FROM serials WHERE contract_id = $1 ORDER BY serial_number",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list serials by contract"))
    }

    /// All serials on contracts of the given customer.
    pub async fn find_by_customer_email(&self, email: &str) -> AppResult<Vec<Serial>> {
        sqlx::query_as::<_, Serial>(
            "SELECT s.* FROM serials s JOIN contracts c ON c.id = s.contract_id \
             WHERE LOWER(c.customer_email) = LOWER($1) \
             ORDER BY s.created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list serials by customer"))
    }

    /// Register a serial and its initial `registered` warranty history entry.
    pub async fn create(
        &self,
        data: &CreateSerial,
        performed_by: Option<Uuid>,
    ) -> AppResult<Serial> {
        let mut tx = begin(&self.pool).await?;

        let serial = sqlx::query_as::<_, Serial>(
            "INSERT INTO serials (serial_number, product_id, contract_id, manufacture_date, \
                                  purchase_date, warranty_start_date, warranty_end_date, \
                                  warranty_status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&data.serial_number)
        .bind(data.product_id)
        .bind(data.contract_id)
        .bind(data.manufacture_date)
        .bind(data.purchase_date)
        .bind(data.warranty_start_date)
        .bind(data.warranty_end_date)
        .bind(data.warranty_status)
        .bind(data.notes.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create serial", NUMBER_CONFLICT))?;

        let description = format!(
            "Serial registered with warranty from {} to {}",
            data.warranty_start_date, data.warranty_end_date
        );
        insert_history(
            &mut tx,
            serial.id,
            WarrantyAction::Registered,
            &description,
            performed_by,
        )
        .await?;

        commit(tx).await?;
        Ok(serial)
    }

    /// Replace a serial's editable fields.
    pub async fn update(&self, id: Uuid, data: &UpdateSerial) -> AppResult<Serial> {
        sqlx::query_as::<_, Serial>(
            "UPDATE serials SET serial_number = $2, product_id = $3, contract_id = $4, \
                                manufacture_date = $5, purchase_date = $6, \
                                warranty_start_date = $7, warranty_end_date = $8, \
                                notes = $9, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.serial_number)
        .bind(data.product_id)
        .bind(data.contract_id)
        .bind(data.manufacture_date)
        .bind(data.purchase_date)
        .bind(data.warranty_start_date)
        .bind(data.warranty_end_date)
        .bind(data.notes.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update serial", NUMBER_CONFLICT))?
        .ok_or_else(|| AppError::not_found(format!("Serial {id} not found")))
    }

    /// Change the stored warranty status and record why, atomically.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: WarrantyStatus,
        description: &str,
        performed_by: Option<Uuid>,
    ) -> AppResult<Serial> {
        let mut tx = begin(&self.pool).await?;

        let serial = sqlx::query_as::<_, Serial>(
            "UPDATE serials SET warranty_status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update warranty status", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Serial {id} not found")))?;

        let action = match status {
            WarrantyStatus::Voided => WarrantyAction::Voided,
            WarrantyStatus::Expired => WarrantyAction::Expired,
            WarrantyStatus::Active => WarrantyAction::StatusChanged,
        };
        insert_history(&mut tx, id, action, description, performed_by).await?;

        commit(tx).await?;
        Ok(serial)
    }

    /// Expire every active warranty that ended before `today`, writing one
    /// `expired` history entry per serial. Returns the expired serials.
    pub async fn expire_lapsed(&self, today: NaiveDate) -> AppResult<Vec<Serial>> {
        let mut tx = begin(&self.pool).await?;

        let expired = sqlx::query_as::<_, Serial>(
            "UPDATE serials SET warranty_status = 'expired', updated_at = NOW() \
             WHERE warranty_status = 'active' AND warranty_end_date < $1 RETURNING *",
        )
        .bind(today)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to expire serials", e))?;

        if !expired.is_empty() {
            let ids: Vec<Uuid> = expired.iter().map(|s| s.id).collect();
            sqlx::query(
                "INSERT INTO warranty_history (serial_id, action, description) \
                 SELECT id, 'expired'::warranty_action, 'Warranty period ended' FROM UNNEST($1::uuid[]) AS t(id)",
            )
            .bind(&ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to record expiries", e)
            })?;
        }

        commit(tx).await?;
        Ok(expired)
    }

    /// Delete a serial. Its warranty history cascades; tickets are detached.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM serials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_delete_error(e, "Failed to delete serial", "Serial is still in use"))?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_history(
    tx: &mut Transaction<'static, Postgres>,
    serial_id: Uuid,
    action: WarrantyAction,
    description: &str,
    performed_by: Option<Uuid>,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO warranty_history (serial_id, action, description, performed_by) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(serial_id)
    .bind(action)
    .bind(description)
    .bind(performed_by)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, "Failed to record warranty history", &[]))?;
    Ok(())
}
