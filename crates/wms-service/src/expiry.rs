//! Periodic expiry of lapsed warranties and contracts.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use wms_core::config::worker::WorkerConfig;
use wms_core::error::AppError;
use wms_database::repositories::{ContractRepository, SerialRepository};
use wms_entity::notification::{CreateNotification, NotificationKind};

use crate::notification::NotificationService;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Serials moved from active to expired.
    pub serials_expired: u64,
    /// Contracts moved from active to expired.
    pub contracts_expired: u64,
    /// Active contracts ending within the look-ahead window.
    pub contracts_expiring_soon: u64,
}

impl SweepReport {
    /// Whether the sweep has anything worth telling staff.
    pub fn is_noteworthy(&self) -> bool {
        self.serials_expired > 0 || self.contracts_expired > 0 || self.contracts_expiring_soon > 0
    }

    /// Text of the broadcast warning summarizing the sweep.
    pub fn summary(&self, expiring_soon_days: u32) -> String {
        format!(
            "{} warranties and {} contracts expired; {} contracts expire within {} days",
            self.serials_expired,
            self.contracts_expired,
            self.contracts_expiring_soon,
            expiring_soon_days
        )
    }
}

/// Expires lapsed serials and contracts and warns staff about upcoming expiries.
#[derive(Debug, Clone)]
pub struct ExpirySweep {
    serial_repo: Arc<SerialRepository>,
    contract_repo: Arc<ContractRepository>,
    notifications: Arc<NotificationService>,
    expiring_soon_days: u32,
}

impl ExpirySweep {
    /// Creates a new sweep.
    pub fn new(
        serial_repo: Arc<SerialRepository>,
        contract_repo: Arc<ContractRepository>,
        notifications: Arc<NotificationService>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            serial_repo,
            contract_repo,
            notifications,
            expiring_soon_days: config.expiring_soon_days,
        }
    }

    /// Runs the sweep for the current date.
    pub async fn run(&self) -> Result<SweepReport, AppError> {
        self.run_on(Utc::now().date_naive()).await
    }

    /// Runs the sweep as of `today`.
    pub async fn run_on(&self, today: NaiveDate) -> Result<SweepReport, AppError> {
        let expired = self.serial_repo.expire_lapsed(today).await?;
        let contracts_expired = self.contract_repo.expire_lapsed(today).await?;
        let horizon = today
            .checked_add_days(Days::new(u64::from(self.expiring_soon_days)))
            .unwrap_or(today);
        let contracts_expiring_soon = self
            .contract_repo
            .count_ending_between(today, horizon)
            .await?;

        let report = SweepReport {
            serials_expired: expired.len() as u64,
            contracts_expired,
            contracts_expiring_soon,
        };

        for serial in &expired {
            info!(serial_number = %serial.serial_number, "Warranty expired");
        }
        info!(
            serials_expired = report.serials_expired,
            contracts_expired = report.contracts_expired,
            contracts_expiring_soon = report.contracts_expiring_soon,
            "Expiry sweep finished"
        );

        if report.is_noteworthy() {
            self.notifications
                .notify(CreateNotification::broadcast(
                    NotificationKind::Warning,
                    "Warranty expiry",
                    report.summary(self.expiring_soon_days),
                ))
                .await;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_sweep_is_not_noteworthy() {
        assert!(!SweepReport::default().is_noteworthy());
        let soon = SweepReport {
            contracts_expiring_soon: 1,
            ..SweepReport::default()
        };
        assert!(soon.is_noteworthy());
    }

    #[test]
    fn summary_lists_every_counter() {
        let report = SweepReport {
            serials_expired: 3,
            contracts_expired: 1,
            contracts_expiring_soon: 4,
        };
        assert_eq!(
            report.summary(30),
            "3 warranties and 1 contracts expired; 4 contracts expire within 30 days"
        );
    }
}
