//! Serial registration, warranty lookups and warranty status changes.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wms_auth::rbac::{Permission, RbacEnforcer};
use wms_core::error::{AppError, ErrorKind};
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_database::repositories::{
    ContractRepository, ProductRepository, SerialFilter, SerialRepository, TicketRepository,
    WarrantyHistoryRepository,
};
use wms_entity::contract::{Contract, ContractSummary};
use wms_entity::product::{Product, ProductSummary};
use wms_entity::serial::{
    CreateSerial, Serial, UpdateSerial, WarrantyCheck, WarrantyStatus, WarrantyWindow,
};
use wms_entity::ticket::{Ticket, TicketPriority};
use wms_entity::warranty::WarrantyHistory;

use super::records::{SerialRecord, load_records};
use crate::context::RequestContext;
use crate::ticket::{CreateTicketInput, TicketOrigin, TicketService};
use crate::user::normalize_email;

/// Fields for registering a serial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSerialInput {
    /// Unique serial number.
    pub serial_number: String,
    /// Product the unit is an instance of.
    pub product_id: Uuid,
    /// Covering contract.
    pub contract_id: Option<Uuid>,
    /// Manufacture date.
    pub manufacture_date: Option<NaiveDate>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Explicit warranty start.
    pub warranty_start_date: Option<NaiveDate>,
    /// Explicit warranty end.
    pub warranty_end_date: Option<NaiveDate>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Partial serial edit; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSerialInput {
    pub serial_number: Option<String>,
    pub product_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub manufacture_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_start_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Staff shortcut for opening a ticket against a covered unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarrantyRequestInput {
    /// Serial number of the unit.
    pub serial_number: String,
    /// Problem description.
    pub issue_description: String,
    /// Priority; medium when omitted.
    pub priority: Option<TicketPriority>,
    /// Customer name; the contract's customer when omitted.
    pub customer_name: Option<String>,
    /// Customer email; the contract's when omitted.
    pub customer_email: Option<String>,
    /// Customer phone; the contract's when omitted.
    pub customer_phone: Option<String>,
}

/// A serial with product, contract, tickets and warranty history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialDetail {
    /// The unit.
    #[serde(flatten)]
    pub serial: Serial,
    /// Product of the unit.
    pub product: Option<ProductSummary>,
    /// Covering contract.
    pub contract: Option<ContractSummary>,
    /// Tickets raised against the unit, newest first.
    pub tickets: Vec<Ticket>,
    /// Warranty service history, newest first.
    pub warranty_history: Vec<WarrantyHistory>,
}

/// Product fields shown in a public warranty lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarrantyLookupProduct {
    pub name: String,
    pub model: String,
}

/// Public answer to "is this unit still covered?".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarrantyLookup {
    pub serial_number: String,
    pub product: WarrantyLookupProduct,
    pub customer_name: Option<String>,
    pub warranty: WarrantyCheck,
}

/// Manages tracked units and their warranty coverage.
#[derive(Debug, Clone)]
pub struct SerialService {
    serial_repo: Arc<SerialRepository>,
    product_repo: Arc<ProductRepository>,
    contract_repo: Arc<ContractRepository>,
    ticket_repo: Arc<TicketRepository>,
    history_repo: Arc<WarrantyHistoryRepository>,
    tickets: Arc<TicketService>,
    rbac: Arc<RbacEnforcer>,
}

impl SerialService {
    /// Creates a new serial service.
    pub fn new(
        serial_repo: Arc<SerialRepository>,
        product_repo: Arc<ProductRepository>,
        contract_repo: Arc<ContractRepository>,
        ticket_repo: Arc<TicketRepository>,
        history_repo: Arc<WarrantyHistoryRepository>,
        tickets: Arc<TicketService>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            serial_repo,
            product_repo,
            contract_repo,
            ticket_repo,
            history_repo,
            tickets,
            rbac,
        }
    }

    /// Registers a unit, deriving its warranty window from the product and contract.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateSerialInput,
    ) -> Result<Serial, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::SerialManage)?;

        let serial_number = input.serial_number.trim().to_string();
        if serial_number.is_empty() {
            return Err(AppError::validation("Serial number is required"));
        }

        let product = self.product(input.product_id).await?;
        let contract = match input.contract_id {
            Some(id) => Some(self.contract(id).await?),
            None => None,
        };

        let window = WarrantyWindow::resolve(
            input.warranty_start_date,
            input.warranty_end_date,
            input.purchase_date,
            contract.as_ref().map(|c| c.start_date),
            product.warranty_months,
            today(),
        )?;

        let data = CreateSerial {
            serial_number,
            product_id: product.id,
            contract_id: contract.as_ref().map(|c| c.id),
            manufacture_date: input.manufacture_date,
            purchase_date: input.purchase_date,
            warranty_start_date: window.start,
            warranty_end_date: window.end,
            warranty_status: WarrantyStatus::Active,
            notes: input.notes,
        };

        let serial = self
            .serial_repo
            .create(&data, Some(ctx.user_id))
            .await
            .map_err(|e| duplicate_number(e, &data.serial_number))?;

        info!(
            serial_id = %serial.id,
            serial_number = %serial.serial_number,
            warranty_end = %window.end,
            "Serial registered"
        );
        Ok(serial)
    }

    /// Lists serials, newest first.
    pub async fn list(
        &self,
        filter: &SerialFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Serial>, AppError> {
        self.serial_repo.find_all(filter, page).await
    }

    /// Gets a serial by ID with its relations.
    pub async fn get(&self, id: Uuid) -> Result<SerialDetail, AppError> {
        let serial = self.find(id).await?;
        self.detail(serial).await
    }

    /// Gets a serial by serial number with its relations.
    pub async fn get_by_number(&self, serial_number: &str) -> Result<SerialDetail, AppError> {
        let serial = self.find_by_number(serial_number).await?;
        self.detail(serial).await
    }

    /// Applies a partial edit and re-validates the warranty window.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateSerialInput,
    ) -> Result<Serial, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::SerialManage)?;

        let current = self.find(id).await?;

        let serial_number = match input.serial_number {
            Some(number) if number.trim().is_empty() => {
                return Err(AppError::validation("Serial number is required"));
            }
            Some(number) => number.trim().to_string(),
            None => current.serial_number,
        };
        if let Some(product_id) = input.product_id {
            self.product(product_id).await?;
        }
        if let Some(contract_id) = input.contract_id {
            self.contract(contract_id).await?;
        }

        let data = UpdateSerial {
            serial_number,
            product_id: input.product_id.unwrap_or(current.product_id),
            contract_id: input.contract_id.or(current.contract_id),
            manufacture_date: input.manufacture_date.or(current.manufacture_date),
            purchase_date: input.purchase_date.or(current.purchase_date),
            warranty_start_date: input.warranty_start_date.or(current.warranty_start_date),
            warranty_end_date: input.warranty_end_date.or(current.warranty_end_date),
            notes: input.notes.or(current.notes),
        };
        check_window(data.warranty_start_date, data.warranty_end_date)?;

        let serial = self
            .serial_repo
            .update(id, &data)
            .await
            .map_err(|e| duplicate_number(e, &data.serial_number))?;
        info!(serial_id = %id, user_id = %ctx.user_id, "Serial updated");
        Ok(serial)
    }

    /// Deletes a serial; its history cascades and its tickets are detached.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.rbac.require_permission(&ctx.role, Permission::SerialManage)?;

        if !self.serial_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Serial {id} not found")));
        }
        info!(serial_id = %id, user_id = %ctx.user_id, "Serial deleted");
        Ok(())
    }

    /// Units on the contracts of a customer, with tickets and history.
    pub async fn find_by_customer_email(&self, email: &str) -> Result<Vec<SerialRecord>, AppError> {
        let email = normalize_email(email)?;
        let serials = self.serial_repo.find_by_customer_email(&email).await?;
        load_records(serials, &self.ticket_repo, &self.history_repo).await
    }

    /// Public warranty lookup by serial number.
    pub async fn check_warranty(&self, serial_number: &str) -> Result<WarrantyLookup, AppError> {
        let serial = self.find_by_number(serial_number).await?;
        let product = self.product(serial.product_id).await?;
        let customer_name = match serial.contract_id {
            Some(id) => self
                .contract_repo
                .find_by_id(id)
                .await?
                .map(|c| c.customer_name),
            None => None,
        };

        Ok(WarrantyLookup {
            warranty: serial.warranty_on(today()),
            serial_number: serial.serial_number,
            product: WarrantyLookupProduct {
                name: product.name,
                model: product.model,
            },
            customer_name,
        })
    }

    /// Changes the stored warranty status, recording who did it and why.
    pub async fn update_warranty_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: WarrantyStatus,
        notes: Option<String>,
    ) -> Result<Serial, AppError> {
        self.rbac
            .require_permission(&ctx.role, Permission::WarrantyStatusChange)?;

        let current = self.find(id).await?;
        let description = status_change_description(current.warranty_status, status, notes.as_deref());

        let serial = self
            .serial_repo
            .update_status(id, status, &description, Some(ctx.user_id))
            .await?;
        info!(
            serial_id = %id,
            from = %current.warranty_status,
            to = %status,
            user_id = %ctx.user_id,
            "Warranty status changed"
        );
        Ok(serial)
    }

    /// Opens a ticket for a unit whose warranty is currently valid.
    pub async fn create_warranty_request(
        &self,
        ctx: &RequestContext,
        input: WarrantyRequestInput,
    ) -> Result<Ticket, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::TicketWrite)?;

        let serial = self.find_by_number(&input.serial_number).await?;
        if !serial.warranty_on(today()).is_valid {
            return Err(AppError::validation(format!(
                "Warranty is not valid for serial {}",
                serial.serial_number
            )));
        }

        let contract = match serial.contract_id {
            Some(id) => self.contract_repo.find_by_id(id).await?,
            None => None,
        };
        let customer_name = input
            .customer_name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| contract.as_ref().map(|c| c.customer_name.clone()))
            .ok_or_else(|| AppError::validation("Customer name is required"))?;

        self.tickets
            .open(
                TicketOrigin::Staff,
                CreateTicketInput {
                    serial_id: Some(serial.id),
                    issue_description: input.issue_description,
                    priority: input.priority,
                    customer_name,
                    customer_email: input
                        .customer_email
                        .or_else(|| contract.as_ref().map(|c| c.customer_email.clone())),
                    customer_phone: input
                        .customer_phone
                        .or_else(|| contract.as_ref().and_then(|c| c.customer_phone.clone())),
                    assigned_to: None,
                },
                Some(ctx.user_id),
            )
            .await
    }

    async fn detail(&self, serial: Serial) -> Result<SerialDetail, AppError> {
        let product = self
            .product_repo
            .find_by_id(serial.product_id)
            .await?
            .map(|p| p.summary());
        let contract = match serial.contract_id {
            Some(id) => self.contract_repo.find_by_id(id).await?.map(|c| c.summary()),
            None => None,
        };
        let tickets = self.ticket_repo.find_by_serials(&[serial.id]).await?;
        let warranty_history = self.history_repo.find_by_serial(serial.id).await?;

        Ok(SerialDetail {
            serial,
            product,
            contract,
            tickets,
            warranty_history,
        })
    }

    async fn find(&self, id: Uuid) -> Result<Serial, AppError> {
        self.serial_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Serial {id} not found")))
    }

    async fn find_by_number(&self, serial_number: &str) -> Result<Serial, AppError> {
        let serial_number = serial_number.trim();
        self.serial_repo
            .find_by_number(serial_number)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Serial {serial_number} not found")))
    }

    async fn product(&self, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    async fn contract(&self, id: Uuid) -> Result<Contract, AppError> {
        self.contract_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contract {id} not found")))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn check_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), AppError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::validation(format!(
            "Warranty end date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}

fn duplicate_number(err: AppError, serial_number: &str) -> AppError {
    if err.kind == ErrorKind::Conflict {
        AppError::conflict(format!("Serial number {serial_number} already exists"))
    } else {
        err
    }
}

fn status_change_description(
    from: WarrantyStatus,
    to: WarrantyStatus,
    notes: Option<&str>,
) -> String {
    let base = format!("Warranty status changed from {from} to {to}");
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        Some(notes) => format!("{base}: {notes}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn edited_window_must_not_invert() {
        assert!(check_window(Some(d(2024, 5, 1)), Some(d(2024, 4, 30))).is_err());
        assert!(check_window(Some(d(2024, 5, 1)), Some(d(2024, 5, 1))).is_ok());
        assert!(check_window(None, Some(d(2024, 5, 1))).is_ok());
    }

    #[test]
    fn status_change_mentions_both_statuses_and_notes() {
        assert_eq!(
            status_change_description(WarrantyStatus::Active, WarrantyStatus::Voided, None),
            "Warranty status changed from active to voided"
        );
        assert_eq!(
            status_change_description(
                WarrantyStatus::Active,
                WarrantyStatus::Voided,
                Some(" water damage ")
            ),
            "Warranty status changed from active to voided: water damage"
        );
    }

    #[test]
    fn conflicts_name_the_serial() {
        let err = duplicate_number(AppError::conflict("Serial number already exists"), "SN-1");
        assert_eq!(err.message, "Serial number SN-1 already exists");

        let err = duplicate_number(AppError::internal("boom"), "SN-1");
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
