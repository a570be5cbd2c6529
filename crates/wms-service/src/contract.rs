//! Service contract operations.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wms_auth::rbac::{Permission, RbacEnforcer};
use wms_core::error::AppError;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_database::repositories::{
    ContractFilter, ContractRepository, SerialRepository, TicketRepository,
    WarrantyHistoryRepository,
};
use wms_entity::contract::{
    Contract, ContractItemView, CreateContract, NewContractItem, UpdateContract, checked_total,
    contract_total,
};
use wms_entity::serial::Serial;

use crate::context::RequestContext;
use crate::serial::records::{SerialRecord, load_records};
use crate::user::normalize_email;

/// A contract with its line items, covered units and value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDetail {
    /// The contract.
    #[serde(flatten)]
    pub contract: Contract,
    /// Line items with product names.
    pub items: Vec<ContractItemView>,
    /// Units covered by the contract.
    pub serials: Vec<Serial>,
    /// Sum of quantity × unit price over all items.
    pub total_value: i64,
}

/// A customer's contract with each covered unit's tickets and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContract {
    /// The contract.
    #[serde(flatten)]
    pub contract: Contract,
    /// Covered units.
    pub serials: Vec<SerialRecord>,
}

/// Manages service contracts and their line items.
#[derive(Debug, Clone)]
pub struct ContractService {
    contract_repo: Arc<ContractRepository>,
    serial_repo: Arc<SerialRepository>,
    ticket_repo: Arc<TicketRepository>,
    history_repo: Arc<WarrantyHistoryRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl ContractService {
    /// Creates a new contract service.
    pub fn new(
        contract_repo: Arc<ContractRepository>,
        serial_repo: Arc<SerialRepository>,
        ticket_repo: Arc<TicketRepository>,
        history_repo: Arc<WarrantyHistoryRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            contract_repo,
            serial_repo,
            ticket_repo,
            history_repo,
            rbac,
        }
    }

    /// Creates a contract together with its items.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut data: CreateContract,
        items: Vec<NewContractItem>,
    ) -> Result<ContractDetail, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::ContractManage)?;

        data.contract_number = data.contract_number.trim().to_string();
        if data.contract_number.is_empty() {
            return Err(AppError::validation("Contract number is required"));
        }
        if data.customer_name.trim().is_empty() {
            return Err(AppError::validation("Customer name is required"));
        }
        data.customer_email = normalize_email(&data.customer_email)?;
        check_window(data.start_date, data.end_date)?;
        check_items(&items)?;

        let contract = self.contract_repo.create_with_items(&data, &items).await?;
        info!(
            contract_id = %contract.id,
            contract_number = %contract.contract_number,
            items = items.len(),
            "Contract created"
        );
        self.detail(contract).await
    }

    /// Lists contracts, newest first.
    pub async fn list(
        &self,
        filter: &ContractFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Contract>, AppError> {
        self.contract_repo.find_all(filter, page).await
    }

    /// Gets a contract by ID.
    pub async fn get(&self, id: Uuid) -> Result<ContractDetail, AppError> {
        let contract = self.find(id).await?;
        self.detail(contract).await
    }

    /// Gets a contract by its number.
    pub async fn get_by_number(&self, contract_number: &str) -> Result<ContractDetail, AppError> {
        let contract = self
            .contract_repo
            .find_by_number(contract_number.trim())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contract {contract_number} not found")))?;
        self.detail(contract).await
    }

    /// Updates contract fields; `items`, when given, replaces every line.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        mut data: UpdateContract,
        items: Option<Vec<NewContractItem>>,
    ) -> Result<ContractDetail, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::ContractManage)?;

        let current = self.find(id).await?;
        check_window(
            data.start_date.unwrap_or(current.start_date),
            data.end_date.unwrap_or(current.end_date),
        )?;
        if let Some(items) = &items {
            check_items(items)?;
        }
        if data.contract_number.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Contract number cannot be empty"));
        }
        data.customer_email = data
            .customer_email
            .as_deref()
            .map(normalize_email)
            .transpose()?;

        let contract = self
            .contract_repo
            .update_with_items(id, &data, items.as_deref())
            .await?;
        info!(contract_id = %id, items_replaced = items.is_some(), "Contract updated");
        self.detail(contract).await
    }

    /// Contracts of a customer, each with its units' tickets and history.
    pub async fn find_by_customer_email(&self, email: &str) -> Result<Vec<CustomerContract>, AppError> {
        let contracts = self
            .contract_repo
            .find_by_customer_email(email.trim())
            .await?;

        let mut result = Vec::with_capacity(contracts.len());
        for contract in contracts {
            let serials = self.serial_repo.find_by_contract(contract.id).await?;
            let serials = load_records(serials, &self.ticket_repo, &self.history_repo).await?;
            result.push(CustomerContract { contract, serials });
        }
        Ok(result)
    }

    /// Deletes a contract; its items go with it and its serials are detached.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.rbac.require_permission(&ctx.role, Permission::ContractManage)?;

        if !self.contract_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Contract {id} not found")));
        }
        info!(contract_id = %id, "Contract deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Contract, AppError> {
        self.contract_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Contract {id} not found")))
    }

    async fn detail(&self, contract: Contract) -> Result<ContractDetail, AppError> {
        let items = self.contract_repo.find_items(contract.id).await?;
        let serials = self.serial_repo.find_by_contract(contract.id).await?;
        let total_value = contract_total(&items);
        Ok(ContractDetail {
            contract,
            items,
            serials,
            total_value,
        })
    }
}

fn check_window(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::validation(format!(
            "Contract end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

fn check_items(items: &[NewContractItem]) -> Result<(), AppError> {
    for (index, item) in items.iter().enumerate() {
        item.check(index + 1)?;
    }
    checked_total(items).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, unit_price: i64) -> NewContractItem {
        NewContractItem {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price,
            notes: None,
        }
    }

    #[test]
    fn window_must_not_be_inverted() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(check_window(start, end).is_err());
        assert!(check_window(start, start).is_ok());
    }

    #[test]
    fn items_need_positive_quantity_and_price() {
        assert!(check_items(&[item(1, 100), item(0, 100)]).is_err());
        assert!(check_items(&[item(2, -5)]).is_err());
        assert!(check_items(&[item(2, 0), item(1, 999)]).is_ok());
        assert!(check_items(&[]).is_ok());
    }

    #[test]
    fn items_reject_prices_that_would_overflow_the_total() {
        use wms_entity::contract::{MAX_QUANTITY, MAX_UNIT_PRICE};

        assert!(check_items(&[item(2, i64::MAX / 2 + 1)]).is_err());
        assert!(check_items(&[item(1, MAX_UNIT_PRICE + 1)]).is_err());
        assert!(check_items(&[item(MAX_QUANTITY, MAX_UNIT_PRICE)]).is_ok());
    }
}
