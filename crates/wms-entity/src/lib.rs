//! # wms-entity
//!
//! Domain entity models for the Warranty Management System. Every struct
//! in this crate represents a database table row or a domain value object.
//! Database entities derive `sqlx::FromRow`; enums map onto PostgreSQL enum
//! types through `sqlx::Type`.

pub mod contract;
pub mod notification;
pub mod product;
pub mod serial;
pub mod ticket;
pub mod user;
pub mod warranty;
