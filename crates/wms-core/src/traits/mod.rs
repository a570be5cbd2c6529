//! Core traits defined in `wms-core` and implemented by other crates.

pub mod mailer;

pub use mailer::{EmailMessage, Mailer};
