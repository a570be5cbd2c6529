//! # wms-service
//!
//! Business logic for the warranty management system. Each service
//! validates input, enforces role permissions through the RBAC enforcer and
//! persists through the repositories of `wms-database`.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod contract;
pub mod dashboard;
pub mod email;
pub mod expiry;
pub mod notification;
pub mod portal;
pub mod product;
pub mod serial;
pub mod ticket;
pub mod user;
pub mod warranty_history;

pub use context::RequestContext;
pub use contract::{ContractDetail, ContractService, CustomerContract};
pub use dashboard::{DashboardService, DashboardStatistics, StatusCount};
pub use email::{EmailTemplates, build_mailer};
pub use expiry::{ExpirySweep, SweepReport};
pub use notification::{NotificationService, NotifyInput};
pub use portal::{PortalService, SupportRequestInput, SupportRequestReceipt};
pub use product::{ProductDetail, ProductService};
pub use serial::{SerialService, WarrantyLookup};
pub use ticket::{TicketDetail, TicketService};
pub use user::{AdminUserService, UserService};
pub use warranty_history::{RecordWarrantyEvent, WarrantyHistoryService};
