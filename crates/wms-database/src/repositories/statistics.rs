//! Aggregate queries backing the dashboard.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use wms_core::result::AppResult;
use wms_entity::ticket::TicketStatus;

use super::read_error;

/// Contract counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct ContractCounts {
    /// All contracts.
    pub total: i64,
    /// Contracts with status `active`.
    pub active: i64,
    /// Contracts with status `expired`.
    pub expired: i64,
    /// Active contracts whose end date falls in the queried range.
    pub ending_in_range: i64,
}

/// Serial counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct SerialCounts {
    /// All serials.
    pub total: i64,
    /// Serials with an active stored warranty.
    pub active: i64,
}

/// Ticket count for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ProductFailure {
    /// Product ID.
    pub product_id: Uuid,
    /// Product name.
    pub name: String,
    /// Product model.
    pub model: String,
    /// Number of tickets raised against serials of this product.
    pub failures: i64,
}

/// Read-only repository of dashboard aggregates.
#[derive(Debug, Clone)]
pub struct StatisticsRepository {
    pool: PgPool,
}

impl StatisticsRepository {
    /// Create a new statistics repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Contract counters; `ending_in_range` covers `[from, until)`.
    pub async fn contract_counts(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<ContractCounts> {
        sqlx::query_as::<_, ContractCounts>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'active') AS active, \
                    COUNT(*) FILTER (WHERE status = 'expired') AS expired, \
                    COUNT(*) FILTER (WHERE status = 'active' AND end_date >= $1 AND end_date < $2) \
                        AS ending_in_range \
             FROM contracts",
        )
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to count contracts"))
    }

    /// Serial counters.
    pub async fn serial_counts(&self) -> AppResult<SerialCounts> {
        sqlx::query_as::<_, SerialCounts>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE warranty_status = 'active') AS active \
             FROM serials",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to count serials"))
    }

    /// Ticket counts grouped by status. Statuses without tickets are absent.
    pub async fn ticket_status_counts(&self) -> AppResult<Vec<(TicketStatus, i64)>> {
        sqlx::query_as::<_, (TicketStatus, i64)>(
            "SELECT status, COUNT(*) FROM tickets GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to count tickets by status"))
    }

    /// Products with the most tickets.
    pub async fn top_failing_products(&self, limit: i64) -> AppResult<Vec<ProductFailure>> {
        sqlx::query_as::<_, ProductFailure>(
            "SELECT p.id AS product_id, p.name, p.model, COUNT(t.id) AS failures \
             FROM tickets t \
             JOIN serials s ON s.id = t.serial_id \
             JOIN products p ON p.id = s.product_id \
             GROUP BY p.id, p.name, p.model \
             ORDER BY failures DESC, p.name ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to rank failing products"))
    }

    /// Value of contracts starting in `[from, until)`, capped at `i64::MAX`.
    pub async fn contract_revenue(&self, from: NaiveDate, until: NaiveDate) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT LEAST(COALESCE(SUM(ci.quantity::NUMERIC * ci.unit_price), 0), \
                          9223372036854775807)::BIGINT \
             FROM contract_items ci JOIN contracts c ON c.id = ci.contract_id \
             WHERE c.start_date >= $1 AND c.start_date < $2",
        )
        .bind(from)
        .bind(until)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to sum contract revenue"))
    }
}
