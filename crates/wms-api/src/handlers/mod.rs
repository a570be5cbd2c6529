//! Route handlers organized by domain.

pub mod auth;
pub mod contract;
pub mod dashboard;
pub mod health;
pub mod notification;
pub mod portal;
pub mod product;
pub mod serial;
pub mod ticket;
pub mod user;
pub mod warranty_history;
