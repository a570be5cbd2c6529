//! Warranty service history entities.

pub mod action;
pub mod history;

pub use action::WarrantyAction;
pub use history::{CreateWarrantyHistory, UpdateWarrantyHistory, WarrantyHistory};
