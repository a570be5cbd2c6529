//! Pure folding of raw counts into dashboard figures.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use wms_database::repositories::statistics::{ContractCounts, ProductFailure, SerialCounts};
use wms_entity::ticket::TicketStatus;

/// Number of products in the failure ranking.
pub const TOP_FAILING_LIMIT: i64 = 5;

/// Headline figures of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStatistics {
    pub total_contracts: i64,
    pub active_contracts: i64,
    pub expired_contracts: i64,
    /// Active contracts ending in the current calendar month.
    pub expiring_this_month: i64,
    pub total_serials: i64,
    pub active_warranties: i64,
    /// Tickets in `new` or `received`.
    pub pending_requests: i64,
    /// Tickets in `in_progress`.
    pub processing_requests: i64,
    /// Tickets in `resolved` or `closed`.
    pub completed_requests: i64,
    /// Value of contracts starting this month, in the smallest currency unit.
    pub monthly_revenue: i64,
    pub top_failing_products: Vec<ProductFailure>,
}

/// Ticket counts folded into the three workflow stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBuckets {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
}

/// One bar of the warranty request chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: TicketStatus,
    pub count: i64,
}

/// First day of the month containing `today` and first day of the next one.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    (first, next)
}

/// Fold per-status counts into pending, processing and completed.
pub fn request_buckets(counts: &[(TicketStatus, i64)]) -> RequestBuckets {
    counts
        .iter()
        .fold(RequestBuckets::default(), |mut buckets, (status, count)| {
            match status {
                TicketStatus::New | TicketStatus::Received => buckets.pending += count,
                TicketStatus::InProgress => buckets.processing += count,
                TicketStatus::Resolved | TicketStatus::Closed => buckets.completed += count,
            }
            buckets
        })
}

/// One entry per status in workflow order, zero when absent.
pub fn status_chart(counts: &[(TicketStatus, i64)]) -> Vec<StatusCount> {
    TicketStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: counts
                .iter()
                .filter(|(s, _)| *s == status)
                .map(|(_, c)| c)
                .sum(),
        })
        .collect()
}

/// Assemble the headline figures.
pub fn build_statistics(
    contracts: ContractCounts,
    serials: SerialCounts,
    ticket_counts: &[(TicketStatus, i64)],
    monthly_revenue: i64,
    top_failing_products: Vec<ProductFailure>,
) -> DashboardStatistics {
    let buckets = request_buckets(ticket_counts);
    DashboardStatistics {
        total_contracts: contracts.total,
        active_contracts: contracts.active,
        expired_contracts: contracts.expired,
        expiring_this_month: contracts.ending_in_range,
        total_serials: serials.total,
        active_warranties: serials.active,
        pending_requests: buckets.pending,
        processing_requests: buckets.processing,
        completed_requests: buckets.completed,
        monthly_revenue,
        top_failing_products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        assert_eq!(month_bounds(d(2024, 2, 17)), (d(2024, 2, 1), d(2024, 3, 1)));
        assert_eq!(month_bounds(d(2024, 12, 31)), (d(2024, 12, 1), d(2025, 1, 1)));
    }

    #[test]
    fn buckets_group_statuses() {
        let buckets = request_buckets(&[
            (TicketStatus::New, 2),
            (TicketStatus::Received, 3),
            (TicketStatus::InProgress, 4),
            (TicketStatus::Resolved, 1),
            (TicketStatus::Closed, 6),
        ]);
        assert_eq!(
            buckets,
            RequestBuckets {
                pending: 5,
                processing: 4,
                completed: 7
            }
        );
    }

    #[test]
    fn chart_is_zero_filled_in_workflow_order() {
        let chart = status_chart(&[(TicketStatus::Closed, 9), (TicketStatus::New, 1)]);
        let statuses: Vec<_> = chart.iter().map(|c| c.status).collect();
        assert_eq!(statuses, TicketStatus::ALL.to_vec());
        let counts: Vec<_> = chart.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 9]);
    }

    #[test]
    fn statistics_copy_counts_through() {
        let stats = build_statistics(
            ContractCounts {
                total: 10,
                active: 6,
                expired: 3,
                ending_in_range: 2,
            },
            SerialCounts {
                total: 40,
                active: 31,
            },
            &[(TicketStatus::InProgress, 5)],
            125_000,
            Vec::new(),
        );
        assert_eq!(stats.total_contracts, 10);
        assert_eq!(stats.expiring_this_month, 2);
        assert_eq!(stats.active_warranties, 31);
        assert_eq!(stats.processing_requests, 5);
        assert_eq!(stats.pending_requests, 0);
        assert_eq!(stats.monthly_revenue, 125_000);
    }
}
