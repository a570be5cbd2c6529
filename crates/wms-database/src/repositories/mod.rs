//! Repository implementations, one per table group.

pub mod contract;
pub mod notification;
pub mod product;
pub mod serial;
pub mod statistics;
pub mod ticket;
pub mod user;
pub mod warranty_history;

pub use contract::{ContractFilter, ContractRepository};
pub use notification::NotificationRepository;
pub use product::{ProductFilter, ProductRepository};
pub use serial::{SerialFilter, SerialRepository};
pub use statistics::StatisticsRepository;
pub use ticket::{TicketFilter, TicketRepository};
pub use user::{UserFilter, UserRepository};
pub use warranty_history::WarrantyHistoryRepository;

use sqlx::{PgPool, Postgres, Transaction};

use wms_core::error::{AppError, ErrorKind};
use wms_core::result::AppResult;

/// PostgreSQL `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Map a failed INSERT/UPDATE to an application error.
///
/// Unique constraints listed in `conflicts` become `Conflict` errors with the
/// paired message; foreign-key and check violations become `Validation`.
pub(crate) fn map_write_error(
    err: sqlx::Error,
    context: &str,
    conflicts: &[(&str, &str)],
) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(constraint) = db_err.constraint() {
            if let Some((_, message)) = conflicts.iter().find(|(name, _)| *name == constraint) {
                return AppError::conflict(*message);
            }
        }
        match db_err.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::validation(format!(
                    "{context}: referenced record does not exist"
                ));
            }
            Some(CHECK_VIOLATION) => {
                return AppError::validation(format!("{context}: value out of range"));
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}

/// Map a failed DELETE; rows still referenced elsewhere become `Conflict`.
pub(crate) fn map_delete_error(err: sqlx::Error, context: &str, in_use: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return AppError::conflict(in_use.to_string());
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), err)
}

/// Map a read failure.
pub(crate) fn read_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Start a transaction.
pub(crate) async fn begin(pool: &PgPool) -> AppResult<Transaction<'static, Postgres>> {
    pool.begin().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
    })
}

/// Commit a transaction.
pub(crate) async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
    tx.commit().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
    })
}
