//! # wms-core
//!
//! Core crate for the Warranty Management System. Contains configuration
//! schemas, pagination types, the mail delivery trait and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other WMS crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
