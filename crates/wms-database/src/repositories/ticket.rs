//! Ticket, ticket history and comment repository implementation.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_entity::ticket::{
    CreateTicket, NewTicketHistory, Ticket, TicketChanges, TicketComment, TicketHistory,
    TicketPriority, TicketStatus,
};

use super::{begin, commit, map_write_error, read_error};

const NUMBER_CONFLICT: &[(&str, &str)] =
    &[("tickets_ticket_number_key", "Ticket number already exists")];

/// Optional list filters for tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Restrict to one status.
    pub status: Option<TicketStatus>,
    /// Restrict to one priority.
    pub priority: Option<TicketPriority>,
    /// Restrict to one assignee.
    pub assigned_to: Option<Uuid>,
}

/// Repository for support tickets.
#[derive(Debug, Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    /// Create a new ticket repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Error for an update whose base version no longer matches.
    pub fn stale_update(id: Uuid, exists: bool) -> AppError {
        if exists {
            AppError::conflict(format!(
                "Ticket {id} was modified by another request, reload and retry"
            ))
        } else {
            AppError::not_found(format!("Ticket {id} not found"))
        }
    }

    /// Find a ticket by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find ticket"))
    }

    /// List tickets, newest first.
    pub async fn find_all(
        &self,
        filter: &TicketFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Ticket>> {
        const WHERE: &str = "WHERE ($1::ticket_status IS NULL OR status = $1) \
             AND ($2::ticket_priority IS NULL OR priority = $2) \
             AND ($3::uuid IS NULL OR assigned_to = $3)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tickets {WHERE}"))
            .bind(filter.status)
            .bind(filter.priority)
            .bind(filter.assigned_to)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error("Failed to count tickets"))?;

        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT * FROM tickets {WHERE} ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.status)
        .bind(filter.priority)
        .bind(filter.assigned_to)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list tickets"))?;

        Ok(PageResponse::new(tickets, page, total as u64))
    }

    /// Tickets raised against any of the given serials, newest first.
    pub async fn find_by_serials(&self, serial_ids: &[Uuid]) -> AppResult<Vec<Ticket>> {
        if serial_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE serial_id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(serial_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to list tickets by serial"))
    }

    /// Count open tickets of a customer, matched by ticket email or contract email.
    pub async fn count_open_for_customer(&self, email: &str) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT t.id) FROM tickets t \
             LEFT JOIN serials s ON s.id = t.serial_id \
             LEFT JOIN contracts c ON c.id = s.contract_id \
             WHERE t.status IN ('new', 'received', 'in_progress') \
               AND (LOWER(t.customer_email) = LOWER($1) OR LOWER(c.customer_email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to count customer tickets"))?;
        Ok(count as u64)
    }

    /// Open a ticket and write its initial history entries atomically.
    pub async fn create(
        &self,
        data: &CreateTicket,
        history: &[NewTicketHistory],
    ) -> AppResult<Ticket> {
        let mut tx = begin(&self.pool).await?;

        let ticket = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (ticket_number, serial_id, issue_description, priority, \
                                  customer_name, customer_email, customer_phone, \
                                  assigned_to, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&data.ticket_number)
        .bind(data.serial_id)
        .bind(&data.issue_description)
        .bind(data.priority)
        .bind(&data.customer_name)
        .bind(data.customer_email.as_deref())
        .bind(data.customer_phone.as_deref())
        .bind(data.assigned_to)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create ticket", NUMBER_CONFLICT))?;

        for entry in history {
            insert_history(&mut tx, ticket.id, entry, data.created_by).await?;
        }

        commit(tx).await?;
        Ok(ticket)
    }

    /// Write back a ticket's mutable fields together with the history
    /// entries describing the change.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &TicketChanges,
        history: &[NewTicketHistory],
        performed_by: Option<Uuid>,
    ) -> AppResult<Ticket> {
        let mut tx = begin(&self.pool).await?;

        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET issue_description = $2, priority = $3, status = $4, \
                                customer_name = $5, customer_email = $6, customer_phone = $7, \
                                assigned_to = $8, resolved_at = $9, closed_at = $10, \
                                updated_at = NOW() \
             WHERE id = $1 AND updated_at = $11 RETURNING *",
        )
        .bind(id)
        .bind(&changes.issue_description)
        .bind(changes.priority)
        .bind(changes.status)
        .bind(&changes.customer_name)
        .bind(changes.customer_email.as_deref())
        .bind(changes.customer_phone.as_deref())
        .bind(changes.assigned_to)
        .bind(changes.resolved_at)
        .bind(changes.closed_at)
        .bind(changes.base_updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update ticket", &[]))?;

        let Some(ticket) = ticket else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tickets WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(read_error("Failed to find ticket"))?;
            return Err(Self::stale_update(id, exists));
        };

        for entry in history {
            insert_history(&mut tx, id, entry, performed_by).await?;
        }

        commit(tx).await?;
        Ok(ticket)
    }

    /// Append a single history entry.
    pub async fn add_history(
        &self,
        ticket_id: Uuid,
        entry: &NewTicketHistory,
        performed_by: Option<Uuid>,
    ) -> AppResult<()> {
        let mut tx = begin(&self.pool).await?;
        insert_history(&mut tx, ticket_id, entry, performed_by).await?;
        commit(tx).await
    }

    /// History of a ticket, oldest first, with performer names.
    pub async fn history(&self, ticket_id: Uuid) -> AppResult<Vec<TicketHistory>> {
        sqlx::query_as::<_, TicketHistory>(
            "SELECT h.*, u.full_name AS performed_by_name \
             FROM ticket_history h LEFT JOIN users u ON u.id = h.performed_by \
             WHERE h.ticket_id = $1 ORDER BY h.created_at ASC, h.id ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to load ticket history"))
    }

    /// Add a comment.
    pub async fn add_comment(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        comment: &str,
        is_internal: bool,
    ) -> AppResult<TicketComment> {
        sqlx::query_as::<_, TicketComment>(
            "INSERT INTO ticket_comments (ticket_id, user_id, comment, is_internal) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(ticket_id)
        .bind(user_id)
        .bind(comment)
        .bind(is_internal)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to add comment", &[]))
    }

    /// Comments of a ticket, oldest first, with author names.
    pub async fn comments(&self, ticket_id: Uuid) -> AppResult<Vec<TicketComment>> {
        sqlx::query_as::<_, TicketComment>(
            "SELECT c.*, u.full_name AS author_name \
             FROM ticket_comments c LEFT JOIN users u ON u.id = c.user_id \
             WHERE c.ticket_id = $1 ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to load ticket comments"))
    }

    /// Delete a ticket with its history and comments.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete ticket", e))?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_history(
    tx: &mut Transaction<'static, Postgres>,
    ticket_id: Uuid,
    entry: &NewTicketHistory,
    performed_by: Option<Uuid>,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO ticket_history (ticket_id, action, description, old_value, new_value, performed_by) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(ticket_id)
    .bind(entry.action)
    .bind(&entry.description)
    .bind(entry.old_value.as_deref())
    .bind(entry.new_value.as_deref())
    .bind(performed_by)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_write_error(e, "Failed to record ticket history", &[]))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_update_of_live_row_conflicts() {
        let id = Uuid::new_v4();
        assert_eq!(
            TicketRepository::stale_update(id, true).kind,
            ErrorKind::Conflict
        );
        assert_eq!(
            TicketRepository::stale_update(id, false).kind,
            ErrorKind::NotFound
        );
    }
}
