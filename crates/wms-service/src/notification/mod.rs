//! In-app notifications for staff.

mod service;

pub use service::{NotificationService, NotifyInput};
