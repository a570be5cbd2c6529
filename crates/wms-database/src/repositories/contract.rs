//! Contract and contract item repository implementation.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_entity::contract::{
    Contract, ContractItemView, ContractStatus, CreateContract, NewContractItem, UpdateContract,
};

use super::{begin, commit, map_write_error, read_error};

const NUMBER_CONFLICT: &[(&str, &str)] = &[(
    "contracts_contract_number_key",
    "Contract number already exists",
)];

/// Optional list filters for contracts.
#[derive(Debug, Clone, Default)]
pub struct ContractFilter {
    /// Restrict to one status.
    pub status: Option<ContractStatus>,
    /// Case-insensitive substring of number, customer name or email.
    pub search: Option<String>,
}

/// Repository for service contracts and their line items.
#[derive(Debug, Clone)]
pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    /// Create a new contract repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a contract by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contract>> {
        sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find contract"))
    }

    /// Find a contract by its number.
    pub async fn find_by_number(&self, contract_number: &str) -> AppResult<Option<Contract>> {
        sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE contract_number = $1")
            .bind(contract_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find contract by number"))
    }

    /// List contracts, newest first.
    pub async fn find_all(
        &self,
        filter: &ContractFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Contract>> {
        const WHERE: &str = "WHERE ($1::contract_status IS NULL OR status = $1) \
             AND ($2::text IS NULL OR contract_number ILIKE '%' || $2 || '%' \
                  OR customer_name ILIKE '%' || $2 || '%' \
                  OR customer_email ILIKE '%' || $2 || '%')";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM contracts {WHERE}"))
            .bind(filter.status)
            .bind(filter.search.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to count contracts"))?;

        let contracts = sqlx::query_as::<_, Contract>(&format!(
            "SELECT * FROM contracts {WHERE} ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.status)
        .bind(filter.search.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list contracts"))?;

        Ok(PageResponse::new(contracts, page, total as u64))
    }

    /// All contracts of a customer, newest first.
    pub async fn find_by_customer_email(&self, email: &str) -> AppResult<Vec<Contract>> {
        sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE LOWER(customer_email) = LOWER($1) \
             ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to find contracts by customer"))
    }

    /// Line items of a contract joined with product name and model.
    pub async fn find_items(&self, contract_id: Uuid) -> AppResult<Vec<ContractItemView>> {
        sqlx::query_as::<_, ContractItemView>(
            "SELECT ci.id, ci.product_id, p.name AS product_name, p.model AS product_model, \
                    ci.quantity, ci.unit_price, ci.notes \
             FROM contract_items ci JOIN products p ON p.id = ci.product_id \
             WHERE ci.contract_id = $1 ORDER BY ci.created_at, ci.id",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list contract items"))
    }

    /// Create a contract and its items atomically.
    pub async fn create_with_items(
        &self,
        data: &CreateContract,
        items: &[NewContractItem],
    ) -> AppResult<Contract> {
        let mut tx = begin(&self.pool).await?;

        let contract = sqlx::query_as::<_, Contract>(
            "INSERT INTO contracts (contract_number, customer_name, customer_email, customer_phone, \
                                    customer_address, start_date, end_date, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&data.contract_number)
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(data.customer_phone.as_deref())
        .bind(data.customer_address.as_deref())
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.status)
        .bind(data.notes.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create contract", NUMBER_CONFLICT))?;

        insert_items(&mut tx, contract.id, items).await?;
        commit(tx).await?;
        Ok(contract)
    }

    /// Update a contract; when `items` is given it replaces every line.
    pub async fn update_with_items(
        &self,
        id: Uuid,
        data: &UpdateContract,
        items: Option<&[NewContractItem]>,
    ) -> AppResult<Contract> {
        let mut tx = begin(&self.pool).await?;

        let contract = sqlx::query_as::<_, Contract>(
            "UPDATE contracts SET contract_number = COALESCE($2, contract_number), \
                                  customer_name = COALESCE($3, customer_name), \
                                  customer_email = COALESCE($4, customer_email), \
                                  customer_phone = COALESCE($5, customer_phone), \
                                  customer_address = COALESCE($6, customer_address), \
                                  start_date = COALESCE($7, start_date), \
                                  end_date = COALESCE($8, end_date), \
                                  status = COALESCE($9, status), \
                                  notes = COALESCE($10, notes), \
                                  updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.contract_number.as_deref())
        .bind(data.customer_name.as_deref())
        .bind(data.customer_email.as_deref())
        .bind(data.customer_phone.as_deref())
        .bind(data.customer_address.as_deref())
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.status)
        .bind(data.notes.as_deref())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update contract", NUMBER_CONFLICT))?
        .ok_or_else(|| AppError::not_found(format!("Contract {id} not found")))?;

        if let Some(items) = items {
            sqlx::query("DELETE FROM contract_items WHERE contract_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to clear contract items", e)
                })?;
            insert_items(&mut tx, id, items).await?;
        }

        commit(tx).await?;
        Ok(contract)
    }

    /// Delete a contract. Items cascade and serials are detached.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete contract", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every active contract that ended before `today` as expired.
    pub async fn expire_lapsed(&self, today: chrono::NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE contracts SET status = 'expired', updated_at = NOW() \
             WHERE status = 'active' AND end_date < $1",
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to expire contracts", e))?;
        Ok(result.rows_affected())
    }

    /// Count active contracts ending between `from` and `until` inclusive.
    pub async fn count_ending_between(
        &self,
        from: chrono::NaiveDate,
        until: chrono::NaiveDate,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contracts \
             WHERE status = 'active' AND end_date BETWEEN $1 AND $2",
        )
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to count expiring contracts"))?;
        Ok(count as u64)
    }
}

async fn insert_items(
    tx: &mut Transaction<'static, Postgres>,
    contract_id: Uuid,
    items: &[NewContractItem],
) -> AppResult<()> {
    for item in items {
        sqlx::query(
            "INSERT INTO contract_items (contract_id, product_id, quantity, unit_price, notes) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(contract_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.notes.as_deref())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to insert contract item", &[]))?;
    }
    Ok(())
}
