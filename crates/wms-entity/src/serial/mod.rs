//! Product serial (tracked unit) entities.

pub mod model;
pub mod warranty;

pub use model::{CreateSerial, Serial, SerialSummary, UpdateSerial};
pub use warranty::{WarrantyCheck, WarrantyStatus, WarrantyWindow};
