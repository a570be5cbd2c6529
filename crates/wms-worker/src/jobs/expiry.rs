//! Warranty and contract expiry job.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use wms_service::expiry::{ExpirySweep, SweepReport};

/// Runs the expiry sweep, skipping a tick while a previous run is in flight.
#[derive(Debug)]
pub struct ExpiryJob {
    /// The sweep to run
    sweep: Arc<ExpirySweep>,
    /// Set while a sweep is running
    running: AtomicBool,
}

impl ExpiryJob {
    /// Create a new expiry job
    pub fn new(sweep: Arc<ExpirySweep>) -> Self {
        Self {
            sweep,
            running: AtomicBool::new(false),
        }
    }

    /// Run one sweep. Returns `None` when skipped or failed.
    pub async fn execute(&self) -> Option<SweepReport> {
        if self.running.swap(true, Ordering::AcqRel) {
            tracing::warn!("Expiry sweep still running, skipping this tick");
            return None;
        }

        let result = self.sweep.run().await;
        self.running.store(false, Ordering::Release);

        match result {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Expiry sweep failed: {}", e);
                None
            }
        }
    }
}
