//! Ticket lifecycle: opening, editing, assignment, comments and customer email.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use wms_auth::rbac::{Permission, RbacEnforcer};
use wms_core::error::{AppError, ErrorKind};
use wms_core::traits::mailer::Mailer;
use wms_core::types::pagination::{PageRequest, PageResponse};
use wms_database::repositories::{
    NotificationRepository, ProductRepository, SerialRepository, TicketFilter, TicketRepository,
    UserRepository,
};
use wms_entity::notification::{CreateNotification, NotificationKind};
use wms_entity::product::ProductSummary;
use wms_entity::serial::SerialSummary;
use wms_entity::ticket::{
    CreateTicket, NewTicketHistory, Ticket, TicketAction, TicketComment, TicketHistory,
    TicketPriority, TicketStatus,
};
use wms_entity::user::{User, UserSummary};

use super::changes::{TicketPatch, plan_update};
use super::numbering::TicketOrigin;
use crate::context::RequestContext;
use crate::email::{EmailTemplates, TicketEmail, TicketEmailKind};

/// Attempts at drawing an unused ticket number.
const NUMBER_ATTEMPTS: usize = 3;

/// Fields for opening a ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTicketInput {
    /// Affected unit.
    pub serial_id: Option<Uuid>,
    /// Problem description.
    pub issue_description: String,
    /// Priority; medium when omitted.
    pub priority: Option<TicketPriority>,
    /// Customer name.
    pub customer_name: String,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer phone.
    pub customer_phone: Option<String>,
    /// Technician to assign right away.
    pub assigned_to: Option<Uuid>,
}

/// A ticket with its unit, assignee and history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDetail {
    /// The ticket.
    #[serde(flatten)]
    pub ticket: Ticket,
    /// Affected unit.
    pub serial: Option<SerialSummary>,
    /// Product of the affected unit.
    pub product: Option<ProductSummary>,
    /// Assigned technician.
    pub assignee: Option<UserSummary>,
    /// Audit trail, oldest first.
    pub history: Vec<TicketHistory>,
}

/// Result of a customer email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    /// Always true; failures are errors.
    pub sent: bool,
    /// Recipient.
    pub to: String,
}

/// Runs the support ticket workflow.
#[derive(Debug, Clone)]
pub struct TicketService {
    ticket_repo: Arc<TicketRepository>,
    serial_repo: Arc<SerialRepository>,
    product_repo: Arc<ProductRepository>,
    user_repo: Arc<UserRepository>,
    notification_repo: Arc<NotificationRepository>,
    mailer: Arc<dyn Mailer>,
    templates: Arc<EmailTemplates>,
    rbac: Arc<RbacEnforcer>,
}

impl TicketService {
    /// Creates a new ticket service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticket_repo: Arc<TicketRepository>,
        serial_repo: Arc<SerialRepository>,
        product_repo: Arc<ProductRepository>,
        user_repo: Arc<UserRepository>,
        notification_repo: Arc<NotificationRepository>,
        mailer: Arc<dyn Mailer>,
        templates: Arc<EmailTemplates>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            ticket_repo,
            serial_repo,
            product_repo,
            user_repo,
            notification_repo,
            mailer,
            templates,
            rbac,
        }
    }

    /// Opens a ticket on behalf of a staff member.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateTicketInput,
    ) -> Result<Ticket, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::TicketWrite)?;
        self.open(TicketOrigin::Staff, input, Some(ctx.user_id)).await
    }

    /// Opens a ticket, writing `created` (and `assigned`) history and
    /// notifying the assignee.
    pub(crate) async fn open(
        &self,
        origin: TicketOrigin,
        input: CreateTicketInput,
        created_by: Option<Uuid>,
    ) -> Result<Ticket, AppError> {
        let issue_description = input.issue_description.trim().to_string();
        if issue_description.is_empty() {
            return Err(AppError::validation("Issue description is required"));
        }
        let customer_name = input.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(AppError::validation("Customer name is required"));
        }

        if let Some(serial_id) = input.serial_id {
            if self.serial_repo.find_by_id(serial_id).await?.is_none() {
                return Err(AppError::not_found(format!("Serial {serial_id} not found")));
            }
        }

        let assignee = match input.assigned_to {
            Some(user_id) => Some(self.active_user(user_id).await?),
            None => None,
        };

        let mut history = vec![NewTicketHistory::new(
            TicketAction::Created,
            match origin {
                TicketOrigin::Staff => "Ticket created",
                TicketOrigin::Portal => "Support request submitted through the customer portal",
            },
        )];
        if let Some(user) = &assignee {
            history.push(NewTicketHistory {
                new_value: Some(user.id.to_string()),
                ..NewTicketHistory::new(
                    TicketAction::Assigned,
                    format!("Ticket assigned to {}", user.full_name),
                )
            });
        }

        let mut data = CreateTicket {
            ticket_number: String::new(),
            serial_id: input.serial_id,
            issue_description,
            priority: input.priority.unwrap_or_default(),
            customer_name,
            customer_email: clean(input.customer_email).map(|e| e.to_lowercase()),
            customer_phone: clean(input.customer_phone),
            assigned_to: assignee.as_ref().map(|u| u.id),
            created_by,
        };

        let ticket = self.insert_numbered(origin, &mut data, &history).await?;
        info!(
            ticket_id = %ticket.id,
            ticket_number = %ticket.ticket_number,
            priority = %ticket.priority,
            "Ticket opened"
        );

        if let Some(user) = assignee {
            self.notify_assignee(&ticket, user.id).await;
        }
        Ok(ticket)
    }

    async fn insert_numbered(
        &self,
        origin: TicketOrigin,
        data: &mut CreateTicket,
        history: &[NewTicketHistory],
    ) -> Result<Ticket, AppError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            data.ticket_number = origin.next_number();
            match self.ticket_repo.create(data, history).await {
                Err(e) if e.kind == ErrorKind::Conflict && attempt < NUMBER_ATTEMPTS => {
                    warn!(ticket_number = %data.ticket_number, "Ticket number collision, retrying");
                }
                result => return result,
            }
        }
    }

    /// Lists tickets, newest first.
    pub async fn list(
        &self,
        filter: &TicketFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Ticket>, AppError> {
        self.ticket_repo.find_all(filter, page).await
    }

    /// Gets a ticket with its unit, assignee and history.
    pub async fn get(&self, id: Uuid) -> Result<TicketDetail, AppError> {
        let ticket = self.find(id).await?;

        let serial = match ticket.serial_id {
            Some(serial_id) => self.serial_repo.find_by_id(serial_id).await?,
            None => None,
        };
        let product = match &serial {
            Some(serial) => self
                .product_repo
                .find_by_id(serial.product_id)
                .await?
                .map(|p| p.summary()),
            None => None,
        };
        let assignee = match ticket.assigned_to {
            Some(user_id) => self.user_repo.find_by_id(user_id).await?.map(|u| u.summary()),
            None => None,
        };
        let history = self.ticket_repo.history(id).await?;

        Ok(TicketDetail {
            serial: serial.map(|s| s.summary()),
            product,
            assignee,
            history,
            ticket,
        })
    }

    /// Applies a partial edit, recording one history entry per tracked change.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: TicketPatch,
    ) -> Result<Ticket, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::TicketWrite)?;

        let current = self.find(id).await?;
        let assignee_name = match patch.assigned_to {
            Some(user_id) if Some(user_id) != current.assigned_to => {
                Some(self.active_user(user_id).await?.full_name)
            }
            _ => None,
        };

        let plan = plan_update(&current, patch, assignee_name.as_deref(), Utc::now())?;
        if plan.is_empty() {
            return Ok(current);
        }

        let ticket = self
            .ticket_repo
            .update(id, &plan.changes, &plan.history, Some(ctx.user_id))
            .await?;

        info!(
            ticket_id = %id,
            user_id = %ctx.user_id,
            status = %ticket.status,
            changes = plan.history.len(),
            "Ticket updated"
        );

        if let Some(assignee) = plan.newly_assigned {
            self.notify_assignee(&ticket, assignee).await;
        }
        Ok(ticket)
    }

    /// Moves a ticket to `status`; `note` replaces the history description.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: TicketStatus,
        note: Option<String>,
    ) -> Result<Ticket, AppError> {
        self.update(
            ctx,
            id,
            TicketPatch {
                status: Some(status),
                note: clean(note),
                ..TicketPatch::default()
            },
        )
        .await
    }

    /// Assigns a technician, who must be an active user.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        technician_id: Uuid,
        note: Option<String>,
    ) -> Result<Ticket, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::TicketWrite)?;

        let current = self.find(id).await?;
        let technician = self.active_user(technician_id).await?;

        let mut plan = plan_update(
            &current,
            TicketPatch {
                assigned_to: Some(technician.id),
                ..TicketPatch::default()
            },
            Some(&technician.full_name),
            Utc::now(),
        )?;
        if plan.is_empty() {
            return Ok(current);
        }
        if let (Some(note), Some(entry)) = (clean(note), plan.history.first_mut()) {
            entry.description = note;
        }

        let ticket = self
            .ticket_repo
            .update(id, &plan.changes, &plan.history, Some(ctx.user_id))
            .await?;
        info!(ticket_id = %id, technician_id = %technician.id, "Ticket assigned");

        self.notify_assignee(&ticket, technician.id).await;
        Ok(ticket)
    }

    /// History of a ticket, oldest first.
    pub async fn history(&self, id: Uuid) -> Result<Vec<TicketHistory>, AppError> {
        self.find(id).await?;
        self.ticket_repo.history(id).await
    }

    /// Adds a comment; comments are internal unless stated otherwise.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        comment: &str,
        is_internal: Option<bool>,
    ) -> Result<TicketComment, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::TicketComment)?;

        let comment = comment.trim();
        if comment.is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }
        self.find(id).await?;

        let created = self
            .ticket_repo
            .add_comment(id, ctx.user_id, comment, is_internal.unwrap_or(true))
            .await?;
        info!(ticket_id = %id, comment_id = %created.id, "Comment added");
        Ok(created)
    }

    /// Comments of a ticket, oldest first.
    pub async fn comments(&self, id: Uuid) -> Result<Vec<TicketComment>, AppError> {
        self.find(id).await?;
        self.ticket_repo.comments(id).await
    }

    /// Emails the customer the outcome of a resolved or closed ticket.
    pub async fn send_email(&self, ctx: &RequestContext, id: Uuid) -> Result<EmailReceipt, AppError> {
        self.rbac.require_permission(&ctx.role, Permission::CustomerEmailSend)?;

        let ticket = self.find(id).await?;
        if !ticket.status.is_completed() {
            return Err(AppError::validation(
                "Email can only be sent for resolved or closed tickets",
            ));
        }
        let to = ticket
            .customer_email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::validation("Ticket has no customer email"))?;

        let content = self.email_content(&ticket).await?;
        let message = self
            .templates
            .render(TicketEmailKind::for_status(ticket.status), &content, &to);
        self.mailer.send(&message).await?;

        self.ticket_repo
            .add_history(
                id,
                &NewTicketHistory::new(TicketAction::EmailSent, format!("Email sent to {to}")),
                Some(ctx.user_id),
            )
            .await?;

        info!(
            ticket_id = %id,
            transport = self.mailer.transport_name(),
            "Customer email sent"
        );
        Ok(EmailReceipt { sent: true, to })
    }

    /// Deletes a ticket with its history and comments.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.rbac.require_permission(&ctx.role, Permission::TicketDelete)?;

        if !self.ticket_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Ticket {id} not found")));
        }
        info!(ticket_id = %id, user_id = %ctx.user_id, "Ticket deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Ticket, AppError> {
        self.ticket_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ticket {id} not found")))
    }

    async fn active_user(&self, user_id: Uuid) -> Result<User, AppError> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            Some(_) => Err(AppError::validation(format!(
                "User {user_id} is inactive and cannot be assigned"
            ))),
            None => Err(AppError::not_found(format!("User {user_id} not found"))),
        }
    }

    async fn email_content(&self, ticket: &Ticket) -> Result<TicketEmail, AppError> {
        let serial = match ticket.serial_id {
            Some(serial_id) => self.serial_repo.find_by_id(serial_id).await?,
            None => None,
        };
        let product_name = match &serial {
            Some(serial) => self
                .product_repo
                .find_by_id(serial.product_id)
                .await?
                .map(|p| p.name),
            None => None,
        };
        let technician = match ticket.assigned_to {
            Some(user_id) => self.user_repo.find_by_id(user_id).await?.map(|u| u.full_name),
            None => None,
        };

        Ok(TicketEmail::from_ticket(ticket)
            .with_unit(serial.map(|s| s.serial_number), product_name)
            .with_technician(technician))
    }

    /// Notify a technician of an assignment. Failures are logged only.
    async fn notify_assignee(&self, ticket: &Ticket, assignee: Uuid) {
        let notification = CreateNotification::to_user(
            assignee,
            NotificationKind::Ticket,
            "Ticket assigned",
            format!(
                "Ticket {} has been assigned to you: {}",
                ticket.ticket_number, ticket.issue_description
            ),
        )
        .for_ticket(ticket.id);

        if let Err(e) = self.notification_repo.create(&notification).await {
            warn!(ticket_id = %ticket.id, error = %e, "Failed to notify assignee");
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
