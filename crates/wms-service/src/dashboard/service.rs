//! Dashboard queries with a short-lived in-memory cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use tracing::debug;

use wms_core::config::DashboardConfig;
use wms_core::error::AppError;
use wms_database::repositories::StatisticsRepository;
use wms_database::repositories::statistics::ProductFailure;

use super::aggregate::{
    DashboardStatistics, StatusCount, TOP_FAILING_LIMIT, build_statistics, month_bounds,
    status_chart,
};

const STATISTICS_KEY: &str = "statistics";

/// Computes dashboard figures and keeps the headline statistics for a short TTL.
#[derive(Debug, Clone)]
pub struct DashboardService {
    stats_repo: Arc<StatisticsRepository>,
    cache: Cache<&'static str, DashboardStatistics>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(stats_repo: Arc<StatisticsRepository>, config: &DashboardConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();
        Self { stats_repo, cache }
    }

    /// Headline statistics, served from cache while fresh.
    pub async fn statistics(&self) -> Result<DashboardStatistics, AppError> {
        if let Some(cached) = self.cache.get(STATISTICS_KEY).await {
            debug!("Dashboard statistics served from cache");
            return Ok(cached);
        }

        let (from, until) = month_bounds(Utc::now().date_naive());
        let contracts = self.stats_repo.contract_counts(from, until).await?;
        let serials = self.stats_repo.serial_counts().await?;
        let ticket_counts = self.stats_repo.ticket_status_counts().await?;
        let revenue = self.stats_repo.contract_revenue(from, until).await?;
        let top = self.stats_repo.top_failing_products(TOP_FAILING_LIMIT).await?;

        let stats = build_statistics(contracts, serials, &ticket_counts, revenue, top);
        self.cache.insert(STATISTICS_KEY, stats.clone()).await;
        Ok(stats)
    }

    /// Ticket count per status, zero-filled.
    pub async fn warranty_request_chart(&self) -> Result<Vec<StatusCount>, AppError> {
        let counts = self.stats_repo.ticket_status_counts().await?;
        Ok(status_chart(&counts))
    }

    /// Products with the most tickets.
    pub async fn product_failure_chart(&self) -> Result<Vec<ProductFailure>, AppError> {
        self.stats_repo.top_failing_products(TOP_FAILING_LIMIT).await
    }
}
