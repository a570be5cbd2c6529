//! Cron scheduler for periodic tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use wms_core::config::worker::WorkerConfig;
use wms_core::error::AppError;

use crate::jobs::ExpiryJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler })
    }

    /// Register the warranty expiry sweep on `config.expiry_cron`
    pub async fn register_expiry(
        &self,
        config: &WorkerConfig,
        job: Arc<ExpiryJob>,
    ) -> Result<(), AppError> {
        let cron = expiry_job(&config.expiry_cron, job)?;

        self.scheduler.add(cron).await.map_err(|e| {
            AppError::internal(format!("Failed to add expiry schedule: {}", e))
        })?;

        tracing::info!("Registered: warranty_expiry ({})", config.expiry_cron);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

fn expiry_job(expression: &str, job: Arc<ExpiryJob>) -> Result<CronJob, AppError> {
    CronJob::new_async(expression, move |_uuid, _lock| {
        let job = Arc::clone(&job);
        Box::pin(async move {
            tracing::debug!("Running scheduled expiry sweep");
            job.execute().await;
        })
    })
    .map_err(|e| {
        AppError::configuration(format!(
            "Invalid worker.expiry_cron '{}': {}",
            expression, e
        ))
    })
}
