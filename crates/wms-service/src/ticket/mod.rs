//! Support ticket workflow.

pub mod changes;
pub mod numbering;
pub mod service;

pub use changes::{TicketPatch, TicketPlan, plan_update};
pub use numbering::TicketOrigin;
pub use service::{CreateTicketInput, EmailReceipt, TicketDetail, TicketService};
