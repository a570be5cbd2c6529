//! Request DTOs with validation.
//!
//! Each body type checks its shape here and converts into the input type
//! of the matching service; business rules stay in the services.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use wms_database::repositories::{
    ContractFilter, ProductFilter, SerialFilter, TicketFilter, UserFilter,
};
use wms_entity::contract::{ContractStatus, CreateContract, NewContractItem, UpdateContract};
use wms_entity::notification::{NotificationKind, UpdateNotification};
use wms_entity::product::{CreateProduct, UpdateProduct};
use wms_entity::serial::WarrantyStatus;
use wms_entity::ticket::{TicketPriority, TicketStatus};
use wms_entity::user::UserRole;
use wms_entity::warranty::{UpdateWarrantyHistory, WarrantyAction};
use wms_service::notification::NotifyInput;
use wms_service::portal::SupportRequestInput;
use wms_service::serial::{CreateSerialInput, UpdateSerialInput, WarrantyRequestInput};
use wms_service::ticket::{CreateTicketInput, TicketPatch};
use wms_service::user::{CreateUserInput, UpdateProfileInput, UpdateUserInput};
use wms_service::warranty_history::RecordWarrantyEvent;

// ── Auth ─────────────────────────────────────────────────────

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Update profile request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileInput {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
        }
    }
}

// ── Users ────────────────────────────────────────────────────

/// Query filters for the user list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

impl From<UserListQuery> for UserFilter {
    fn from(q: UserListQuery) -> Self {
        Self {
            role: q.role,
            search: non_blank(q.search),
        }
    }
}

/// Create user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            role: req.role,
            is_active: req.is_active,
        }
    }
}

/// Update user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            full_name: req.full_name,
            role: req.role,
            is_active: req.is_active,
        }
    }
}

/// Admin password reset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

// ── Products ─────────────────────────────────────────────────

/// Query filters for the product list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListQuery {
    pub model: Option<String>,
    pub category: Option<String>,
}

impl From<ProductListQuery> for ProductFilter {
    fn from(q: ProductListQuery) -> Self {
        Self {
            model: non_blank(q.model),
            category: non_blank(q.category),
        }
    }
}

/// Create product request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Product model is required"))]
    pub model: String,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 1, message = "Warranty months must be at least 1"))]
    pub warranty_months: i32,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: Option<i64>,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            model: req.model,
            description: req.description,
            category: req.category,
            warranty_months: req.warranty_months,
            price: req.price,
        }
    }
}

/// Update product request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 1, message = "Warranty months must be at least 1"))]
    pub warranty_months: Option<i32>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: Option<i64>,
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            model: req.model,
            description: req.description,
            category: req.category,
            warranty_months: req.warranty_months,
            price: req.price,
        }
    }
}

// ── Contracts ────────────────────────────────────────────────

/// Query filters for the contract list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractListQuery {
    pub status: Option<ContractStatus>,
    pub search: Option<String>,
}

impl From<ContractListQuery> for ContractFilter {
    fn from(q: ContractListQuery) -> Self {
        Self {
            status: q.status,
            search: non_blank(q.search),
        }
    }
}

/// One contract line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContractItemRequest {
    pub product_id: Uuid,
    #[validate(range(
        min = 1,
        max = 1_000_000,
        message = "Quantity must be between 1 and 1000000"
    ))]
    pub quantity: i32,
    #[validate(range(
        min = 0i64,
        max = 1_000_000_000_000i64,
        message = "Unit price must be between 0 and 1000000000000"
    ))]
    pub unit_price: i64,
    pub notes: Option<String>,
}

impl From<ContractItemRequest> for NewContractItem {
    fn from(req: ContractItemRequest) -> Self {
        Self {
            product_id: req.product_id,
            quantity: req.quantity,
            unit_price: req.unit_price,
            notes: req.notes,
        }
    }
}

/// Create contract request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContractRequest {
    #[validate(length(min = 1, max = 100, message = "Contract number is required"))]
    pub contract_number: String,
    #[validate(length(min = 1, max = 255, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "A valid customer email is required"))]
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<ContractStatus>,
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<ContractItemRequest>,
}

impl CreateContractRequest {
    /// Split into the contract row and its lines.
    pub fn into_parts(self) -> (CreateContract, Vec<NewContractItem>) {
        let items = self.items.into_iter().map(Into::into).collect();
        let contract = CreateContract {
            contract_number: self.contract_number,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.unwrap_or_default(),
            notes: self.notes,
        };
        (contract, items)
    }
}

/// Update contract request; `items`, when present, replaces every line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateContractRequest {
    #[validate(length(min = 1, max = 100))]
    pub contract_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ContractStatus>,
    pub notes: Option<String>,
    #[validate(nested)]
    pub items: Option<Vec<ContractItemRequest>>,
}

impl UpdateContractRequest {
    /// Split into the field changes and the optional replacement lines.
    pub fn into_parts(self) -> (UpdateContract, Option<Vec<NewContractItem>>) {
        let items = self
            .items
            .map(|items| items.into_iter().map(Into::into).collect());
        let changes = UpdateContract {
            contract_number: self.contract_number,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            notes: self.notes,
        };
        (changes, items)
    }
}

// ── Serials ──────────────────────────────────────────────────

/// Query filters for the serial list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerialListQuery {
    pub status: Option<WarrantyStatus>,
    pub product_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
}

impl From<SerialListQuery> for SerialFilter {
    fn from(q: SerialListQuery) -> Self {
        Self {
            status: q.status,
            product_id: q.product_id,
            contract_id: q.contract_id,
        }
    }
}

/// Register serial request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSerialRequest {
    #[validate(length(min = 1, max = 100, message = "Serial number is required"))]
    pub serial_number: String,
    pub product_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub manufacture_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_start_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<CreateSerialRequest> for CreateSerialInput {
    fn from(req: CreateSerialRequest) -> Self {
        Self {
            serial_number: req.serial_number,
            product_id: req.product_id,
            contract_id: req.contract_id,
            manufacture_date: req.manufacture_date,
            purchase_date: req.purchase_date,
            warranty_start_date: req.warranty_start_date,
            warranty_end_date: req.warranty_end_date,
            notes: req.notes,
        }
    }
}

/// Update serial request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSerialRequest {
    #[validate(length(min = 1, max = 100))]
    pub serial_number: Option<String>,
    pub product_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub manufacture_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_start_date: Option<NaiveDate>,
    pub warranty_end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<UpdateSerialRequest> for UpdateSerialInput {
    fn from(req: UpdateSerialRequest) -> Self {
        Self {
            serial_number: req.serial_number,
            product_id: req.product_id,
            contract_id: req.contract_id,
            manufacture_date: req.manufacture_date,
            purchase_date: req.purchase_date,
            warranty_start_date: req.warranty_start_date,
            warranty_end_date: req.warranty_end_date,
            notes: req.notes,
        }
    }
}

/// Warranty status change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WarrantyStatusRequest {
    pub status: WarrantyStatus,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Staff warranty request for a serial.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WarrantyClaimRequest {
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    #[validate(length(min = 1, message = "Issue description is required"))]
    pub issue_description: String,
    pub priority: Option<TicketPriority>,
    pub customer_name: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

impl From<WarrantyClaimRequest> for WarrantyRequestInput {
    fn from(req: WarrantyClaimRequest) -> Self {
        Self {
            serial_number: req.serial_number,
            issue_description: req.issue_description,
            priority: req.priority,
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
        }
    }
}

// ── Tickets ──────────────────────────────────────────────────

/// Query filters for the ticket list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketListQuery {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assigned_to: Option<Uuid>,
}

impl From<TicketListQuery> for TicketFilter {
    fn from(q: TicketListQuery) -> Self {
        Self {
            status: q.status,
            priority: q.priority,
            assigned_to: q.assigned_to,
        }
    }
}

/// Create ticket request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTicketRequest {
    pub serial_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Issue description is required"))]
    pub issue_description: String,
    pub priority: Option<TicketPriority>,
    #[validate(length(min = 1, max = 255, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: Option<String>,
    #[validate(length(max = 50))]
    pub customer_phone: Option<String>,
    pub assigned_to: Option<Uuid>,
}

impl From<CreateTicketRequest> for CreateTicketInput {
    fn from(req: CreateTicketRequest) -> Self {
        Self {
            serial_id: req.serial_id,
            issue_description: req.issue_description,
            priority: req.priority,
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
            assigned_to: req.assigned_to,
        }
    }
}

/// Update ticket request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTicketRequest {
    #[validate(length(min = 1))]
    pub issue_description: Option<String>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    #[validate(length(max = 50))]
    pub customer_phone: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub note: Option<String>,
}

impl From<UpdateTicketRequest> for TicketPatch {
    fn from(req: UpdateTicketRequest) -> Self {
        Self {
            issue_description: req.issue_description,
            priority: req.priority,
            status: req.status,
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
            assigned_to: req.assigned_to,
            note: req.note,
        }
    }
}

/// Ticket status change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TicketStatusRequest {
    pub status: TicketStatus,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Ticket assignment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignTicketRequest {
    pub technician_id: Uuid,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// New ticket comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub comment: String,
    pub is_internal: Option<bool>,
}

// ── Warranty history ─────────────────────────────────────────

/// Query filters for the warranty history list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarrantyHistoryQuery {
    pub action: Option<WarrantyAction>,
}

/// Record warranty event request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWarrantyHistoryRequest {
    pub serial_id: Uuid,
    pub action: WarrantyAction,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 0, message = "Cost must not be negative"))]
    pub cost: Option<i64>,
    pub performed_at: Option<DateTime<Utc>>,
}

impl From<CreateWarrantyHistoryRequest> for RecordWarrantyEvent {
    fn from(req: CreateWarrantyHistoryRequest) -> Self {
        Self {
            serial_id: req.serial_id,
            action: req.action,
            description: req.description,
            cost: req.cost,
            performed_at: req.performed_at,
        }
    }
}

/// Update warranty event request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWarrantyHistoryRequest {
    pub action: Option<WarrantyAction>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Cost must not be negative"))]
    pub cost: Option<i64>,
    pub performed_at: Option<DateTime<Utc>>,
}

impl From<UpdateWarrantyHistoryRequest> for UpdateWarrantyHistory {
    fn from(req: UpdateWarrantyHistoryRequest) -> Self {
        Self {
            action: req.action,
            description: req.description,
            cost: req.cost,
            performed_at: req.performed_at,
        }
    }
}

// ── Notifications ────────────────────────────────────────────

/// Query filters for the notification list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationListQuery {
    pub unread_only: Option<bool>,
}

/// Create notification request; no `user_id` means broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    pub user_id: Option<Uuid>,
    #[serde(default, alias = "type")]
    pub kind: NotificationKind,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    pub ticket_id: Option<Uuid>,
}

impl From<CreateNotificationRequest> for NotifyInput {
    fn from(req: CreateNotificationRequest) -> Self {
        Self {
            user_id: req.user_id,
            kind: req.kind,
            title: req.title,
            message: req.message,
            ticket_id: req.ticket_id,
        }
    }
}

/// Update notification request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateNotificationRequest {
    #[serde(alias = "type")]
    pub kind: Option<NotificationKind>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub message: Option<String>,
}

impl From<UpdateNotificationRequest> for UpdateNotification {
    fn from(req: UpdateNotificationRequest) -> Self {
        Self {
            kind: req.kind,
            title: req.title,
            message: req.message,
        }
    }
}

// ── Customer portal ──────────────────────────────────────────

/// Public support request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupportRequestBody {
    pub serial_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub customer_email: String,
    #[validate(length(max = 50))]
    pub customer_phone: Option<String>,
    #[validate(length(min = 1, message = "Issue description is required"))]
    pub issue_description: String,
    pub priority: Option<TicketPriority>,
}

impl From<SupportRequestBody> for SupportRequestInput {
    fn from(req: SupportRequestBody) -> Self {
        Self {
            serial_number: non_blank(req.serial_number),
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
            issue_description: req.issue_description,
            priority: req.priority,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_items_are_validated() {
        let req: CreateContractRequest = serde_json::from_value(serde_json::json!({
            "contract_number": "CT-2024-001",
            "customer_name": "Acme",
            "customer_email": "ops@acme.test",
            "start_date": "2024-01-01",
            "end_date": "2024-12-31",
            "items": [{ "product_id": Uuid::nil(), "quantity": 0, "unit_price": 100 }]
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn contract_item_price_has_an_upper_bound() {
        let item: ContractItemRequest = serde_json::from_value(serde_json::json!({
            "product_id": Uuid::nil(),
            "quantity": 2,
            "unit_price": i64::MAX / 2 + 1
        }))
        .unwrap();
        let errors = item.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("unit_price"));

        let item: ContractItemRequest = serde_json::from_value(serde_json::json!({
            "product_id": Uuid::nil(),
            "quantity": 1_000_000,
            "unit_price": 1_000_000_000_000i64
        }))
        .unwrap();
        assert!(item.validate().is_ok());
    }

    #[test]
    fn contract_status_defaults_to_active() {
        let req: CreateContractRequest = serde_json::from_value(serde_json::json!({
            "contract_number": "CT-2024-001",
            "customer_name": "Acme",
            "customer_email": "ops@acme.test",
            "start_date": "2024-01-01",
            "end_date": "2024-12-31"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        let (contract, items) = req.into_parts();
        assert_eq!(contract.status, ContractStatus::Active);
        assert!(items.is_empty());
    }

    #[test]
    fn product_terms_are_range_checked() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Router",
            "model": "RT-100",
            "warranty_months": 0,
            "price": -1
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("warranty_months"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn blank_filters_are_dropped() {
        let filter: ContractFilter = ContractListQuery {
            status: None,
            search: Some("   ".into()),
        }
        .into();
        assert!(filter.search.is_none());
    }

    #[test]
    fn notification_kind_accepts_type_alias() {
        let req: CreateNotificationRequest = serde_json::from_value(serde_json::json!({
            "type": "warning",
            "title": "Heads up",
            "message": "Something happened"
        }))
        .unwrap();
        assert_eq!(req.kind, NotificationKind::Warning);
        assert!(req.user_id.is_none());
    }
}
