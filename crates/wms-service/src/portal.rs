//! Public customer portal: overview, warranty history and support requests.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use wms_core::error::AppError;
use wms_database::repositories::{ContractRepository, SerialRepository, TicketRepository};
use wms_entity::contract::{Contract, ContractStatus};
use wms_entity::notification::{CreateNotification, NotificationKind};
use wms_entity::ticket::{TicketPriority, TicketStatus};

use crate::notification::NotificationService;
use crate::serial::{SerialRecord, SerialService};
use crate::ticket::{CreateTicketInput, TicketOrigin, TicketService};
use crate::user::normalize_email;

/// Number of contracts listed in an overview.
const RECENT_CONTRACTS: usize = 5;

/// Contact details of a customer, from their most recent contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Counters shown at the top of the portal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub total_contracts: usize,
    pub active_contracts: usize,
    pub expired_contracts: usize,
    pub total_serials: usize,
    /// Tickets still new, received or in progress.
    pub active_tickets: u64,
}

/// A contract as listed in the portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentContract {
    pub id: Uuid,
    pub contract_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
    pub item_count: usize,
}

/// Everything the portal landing page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOverview {
    pub customer: CustomerInfo,
    pub summary: CustomerSummary,
    pub recent_contracts: Vec<RecentContract>,
}

/// A support request submitted by a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportRequestInput {
    pub serial_number: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub issue_description: String,
    pub priority: Option<TicketPriority>,
}

/// Acknowledgement returned to the customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportRequestReceipt {
    pub ticket_id: Uuid,
    pub ticket_number: String,
    pub status: TicketStatus,
    pub message: String,
}

/// Read-only customer views keyed by email, plus support requests.
#[derive(Debug, Clone)]
pub struct PortalService {
    contract_repo: Arc<ContractRepository>,
    serial_repo: Arc<SerialRepository>,
    ticket_repo: Arc<TicketRepository>,
    serials: Arc<SerialService>,
    tickets: Arc<TicketService>,
    notifications: Arc<NotificationService>,
}

impl PortalService {
    /// Creates a new portal service.
    pub fn new(
        contract_repo: Arc<ContractRepository>,
        serial_repo: Arc<SerialRepository>,
        ticket_repo: Arc<TicketRepository>,
        serials: Arc<SerialService>,
        tickets: Arc<TicketService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            contract_repo,
            serial_repo,
            ticket_repo,
            serials,
            tickets,
            notifications,
        }
    }

    /// Overview of a customer's contracts, units and open tickets.
    pub async fn overview(&self, email: &str) -> Result<CustomerOverview, AppError> {
        let email = normalize_email(email)?;
        let contracts = self.contract_repo.find_by_customer_email(&email).await?;
        let Some(latest) = contracts.first() else {
            return Err(AppError::not_found(format!(
                "No contracts found for customer {email}"
            )));
        };

        let total_serials = self.serial_repo.find_by_customer_email(&email).await?.len();
        let active_tickets = self.ticket_repo.count_open_for_customer(&email).await?;

        let mut recent_contracts = Vec::with_capacity(RECENT_CONTRACTS);
        for contract in contracts.iter().take(RECENT_CONTRACTS) {
            let item_count = self.contract_repo.find_items(contract.id).await?.len();
            recent_contracts.push(RecentContract {
                id: contract.id,
                contract_number: contract.contract_number.clone(),
                start_date: contract.start_date,
                end_date: contract.end_date,
                status: contract.status,
                item_count,
            });
        }

        Ok(CustomerOverview {
            customer: CustomerInfo {
                name: latest.customer_name.clone(),
                email: latest.customer_email.clone(),
                phone: latest.customer_phone.clone(),
                address: latest.customer_address.clone(),
            },
            summary: summarize(&contracts, total_serials, active_tickets),
            recent_contracts,
        })
    }

    /// The customer's units with their warranty history and tickets.
    pub async fn warranty_history(&self, email: &str) -> Result<Vec<SerialRecord>, AppError> {
        self.serials.find_by_customer_email(email).await
    }

    /// Opens an `SR-` ticket for a customer and alerts staff.
    pub async fn support_request(
        &self,
        input: SupportRequestInput,
    ) -> Result<SupportRequestReceipt, AppError> {
        let customer_email = normalize_email(&input.customer_email)?;

        let serial_id = match input
            .serial_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(number) => Some(
                self.serial_repo
                    .find_by_number(number)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Serial {number} not found")))?
                    .id,
            ),
            None => None,
        };

        let ticket = self
            .tickets
            .open(
                TicketOrigin::Portal,
                CreateTicketInput {
                    serial_id,
                    issue_description: input.issue_description,
                    priority: input.priority,
                    customer_name: input.customer_name,
                    customer_email: Some(customer_email),
                    customer_phone: input.customer_phone,
                    assigned_to: None,
                },
                None,
            )
            .await?;

        self.notifications
            .notify(
                CreateNotification::broadcast(
                    NotificationKind::Ticket,
                    "New support request",
                    format!(
                        "{} submitted support request {}",
                        ticket.customer_name, ticket.ticket_number
                    ),
                )
                .for_ticket(ticket.id),
            )
            .await;

        info!(
            ticket_id = %ticket.id,
            ticket_number = %ticket.ticket_number,
            "Support request received"
        );

        Ok(SupportRequestReceipt {
            ticket_id: ticket.id,
            ticket_number: ticket.ticket_number,
            status: ticket.status,
            message: "Support request created successfully".into(),
        })
    }
}

fn summarize(contracts: &[Contract], total_serials: usize, active_tickets: u64) -> CustomerSummary {
    CustomerSummary {
        total_contracts: contracts.len(),
        active_contracts: contracts
            .iter()
            .filter(|c| c.status == ContractStatus::Active)
            .count(),
        expired_contracts: contracts
            .iter()
            .filter(|c| c.status == ContractStatus::Expired)
            .count(),
        total_serials,
        active_tickets,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn contract(status: ContractStatus) -> Contract {
        let now = Utc::now();
        Contract {
            id: Uuid::new_v4(),
            contract_number: "HD-1".into(),
            customer_name: "Acme".into(),
            customer_email: "ops@acme.test".into(),
            customer_phone: None,
            customer_address: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            status,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_counts_by_status() {
        let contracts = vec![
            contract(ContractStatus::Active),
            contract(ContractStatus::Active),
            contract(ContractStatus::Expired),
            contract(ContractStatus::Cancelled),
        ];
        let summary = summarize(&contracts, 7, 2);
        assert_eq!(
            summary,
            CustomerSummary {
                total_contracts: 4,
                active_contracts: 2,
                expired_contracts: 1,
                total_serials: 7,
                active_tickets: 2,
            }
        );
    }
}
