//! Dashboard statistics and charts.

pub mod aggregate;
mod service;

pub use aggregate::{DashboardStatistics, RequestBuckets, StatusCount};
pub use service::DashboardService;
