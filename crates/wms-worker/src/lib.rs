//! Scheduled background tasks for the warranty management system.
//!
//! This crate provides:
//! - A cron scheduler that owns the periodic jobs
//! - The expiry job, which expires lapsed warranties and contracts

pub mod jobs;
pub mod scheduler;

pub use jobs::ExpiryJob;
pub use scheduler::CronScheduler;
