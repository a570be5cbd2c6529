//! Outbound customer email: transports and ticket templates.

pub mod mailer;
pub mod template;

pub use mailer::{HttpRelayMailer, LogMailer, build_mailer};
pub use template::{EmailTemplates, TicketEmail, TicketEmailKind};
