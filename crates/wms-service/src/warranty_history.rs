//! Warranty service history: inspections, repairs, replacements and notes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wms_auth::rbac::{Permission, RbacEnforcer};
use wms_core::error::AppError;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_database::repositories::{SerialRepository, WarrantyHistoryRepository};
use wms_entity::warranty::{
    CreateWarrantyHistory, UpdateWarrantyHistory, WarrantyAction, WarrantyHistory,
};

use crate::context::RequestContext;

/// Fields for recording a warranty event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordWarrantyEvent {
    pub serial_id: Uuid,
    pub action: WarrantyAction,
    pub description: String,
    /// Cost in the smallest currency unit.
    pub cost: Option<i64>,
    /// When the work happened; now when omitted.
    pub performed_at: Option<DateTime<Utc>>,
}

/// Records what was done to a unit under warranty.
#[derive(Debug, Clone)]
pub struct WarrantyHistoryService {
    history_repo: Arc<WarrantyHistoryRepository>,
    serial_repo: Arc<SerialRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl WarrantyHistoryService {
    /// Creates a new warranty history service.
    pub fn new(
        history_repo: Arc<WarrantyHistoryRepository>,
        serial_repo: Arc<SerialRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            history_repo,
            serial_repo,
            rbac,
        }
    }

    /// Records an event performed by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: RecordWarrantyEvent,
    ) -> Result<WarrantyHistory, AppError> {
        self.rbac
            .require_permission(&ctx.role, Permission::WarrantyHistoryWrite)?;

        let description = required_description(&input.description)?;
        check_cost(input.cost)?;
        if self.serial_repo.find_by_id(input.serial_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Serial {} not found",
                input.serial_id
            )));
        }

        let entry = self
            .history_repo
            .create(&CreateWarrantyHistory {
                serial_id: input.serial_id,
                action: input.action,
                description,
                cost: input.cost,
                performed_by: Some(ctx.user_id),
                performed_at: input.performed_at,
            })
            .await?;

        info!(
            history_id = %entry.id,
            serial_id = %entry.serial_id,
            action = %entry.action,
            "Warranty event recorded"
        );
        Ok(entry)
    }

    /// Lists events, most recent first.
    pub async fn list(
        &self,
        action: Option<WarrantyAction>,
        page: PageRequest,
    ) -> Result<PageResponse<WarrantyHistory>, AppError> {
        self.history_repo.find_all(action, page).await
    }

    /// Events of one unit, most recent first.
    pub async fn by_serial(&self, serial_id: Uuid) -> Result<Vec<WarrantyHistory>, AppError> {
        if self.serial_repo.find_by_id(serial_id).await?.is_none() {
            return Err(AppError::not_found(format!("Serial {serial_id} not found")));
        }
        self.history_repo.find_by_serial(serial_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<WarrantyHistory, AppError> {
        self.history_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Warranty history {id} not found")))
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        mut data: UpdateWarrantyHistory,
    ) -> Result<WarrantyHistory, AppError> {
        self.rbac
            .require_permission(&ctx.role, Permission::WarrantyHistoryWrite)?;

        if let Some(description) = &data.description {
            data.description = Some(required_description(description)?);
        }
        check_cost(data.cost)?;

        let entry = self.history_repo.update(id, &data).await?;
        info!(history_id = %id, user_id = %ctx.user_id, "Warranty event updated");
        Ok(entry)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.rbac
            .require_permission(&ctx.role, Permission::WarrantyHistoryDelete)?;

        if !self.history_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Warranty history {id} not found")));
        }
        info!(history_id = %id, user_id = %ctx.user_id, "Warranty event deleted");
        Ok(())
    }
}

fn required_description(description: &str) -> Result<String, AppError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::validation("Description is required"));
    }
    Ok(description.to_string())
}

fn check_cost(cost: Option<i64>) -> Result<(), AppError> {
    match cost {
        Some(cost) if cost < 0 => Err(AppError::validation("Cost must not be negative")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_trimmed_and_required() {
        assert_eq!(required_description("  replaced fan ").unwrap(), "replaced fan");
        assert!(required_description("   ").is_err());
    }

    #[test]
    fn negative_cost_is_rejected() {
        assert!(check_cost(Some(-1)).is_err());
        assert!(check_cost(Some(0)).is_ok());
        assert!(check_cost(None).is_ok());
    }
}
