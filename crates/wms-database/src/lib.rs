//! # wms-database
//!
//! PostgreSQL connection management, embedded migrations and one
//! repository per table.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
