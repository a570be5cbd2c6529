//! Support ticket entities.

pub mod comment;
pub mod history;
pub mod model;
pub mod priority;
pub mod status;

pub use comment::TicketComment;
pub use history::{NewTicketHistory, TicketAction, TicketHistory};
pub use model::{CreateTicket, Ticket, TicketChanges};
pub use priority::TicketPriority;
pub use status::TicketStatus;
