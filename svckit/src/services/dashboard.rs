use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::codes::{self, STATUS_COMPLETED};
use crate::errors::ApiError;
use crate::filters::{BookingFilters, Sort};
use crate::http::ApiClient;
use crate::services::bookings::parse_listing;
use crate::services::settle;
use crate::types::{BookingListItem, DashboardStats};

#[derive(Clone)]
pub struct DashboardService {
    client: Arc<ApiClient>,
}

/// Revenue from completed bookings with a final price.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total: f64,
    pub this_month: f64,
    pub last_month: f64,
    /// Month-over-month change in percent; 0 when last month had no revenue.
    pub growth: f64,
}

impl DashboardService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let result = self
            .client
            .get::<Option<DashboardStats>>("/admin/dashboard", &[])
            .await;
        settle("dashboard stats", result)?.ok_or_else(|| {
            ApiError::InvalidResponseShape("dashboard response had no data".to_string())
        })
    }

    /// Newest bookings first, at most `limit` of them.
    pub async fn recent_bookings(&self, limit: u32) -> Result<Vec<BookingListItem>, ApiError> {
        if limit == 0 {
            return Err(ApiError::InvalidArgument("limit must be positive".to_string()));
        }
        let filters = BookingFilters::with_page_size(limit);
        self.fetch("recent bookings", &filters, Some(&Sort::newest_first()))
            .await
    }

    /// Urgent or emergency bookings that are still pending or under review.
    pub async fn urgent_bookings(&self) -> Result<Vec<BookingListItem>, ApiError> {
        let mut filters = BookingFilters::default();
        filters.urgency.extend([codes::URGENCY_URGENT, codes::URGENCY_EMERGENCY]);
        filters.status.extend([codes::STATUS_PENDING, codes::STATUS_UNDER_REVIEW]);
        self.fetch("urgent bookings", &filters, None).await
    }

    pub async fn revenue_summary(&self, now: DateTime<Utc>) -> Result<RevenueSummary, ApiError> {
        let mut filters = BookingFilters::default();
        filters.status.insert(STATUS_COMPLETED);
        let completed = self.fetch("revenue summary", &filters, None).await?;
        Ok(summarize_revenue(&completed, now))
    }

    async fn fetch(
        &self,
        operation: &str,
        filters: &BookingFilters,
        sort: Option<&Sort>,
    ) -> Result<Vec<BookingListItem>, ApiError> {
        let query = filters.request_pairs(sort);
        let result = self.client.get::<Value>("/admin/bookings", &query).await;
        let page = parse_listing(settle(operation, result)?)?;
        Ok(page.items)
    }
}

pub fn summarize_revenue(bookings: &[BookingListItem], now: DateTime<Utc>) -> RevenueSummary {
    let this_month = month_start(now.year(), now.month());
    let last_month = if now.month() == 1 {
        month_start(now.year() - 1, 12)
    } else {
        month_start(now.year(), now.month() - 1)
    };

    let mut summary = RevenueSummary::default();
    for booking in bookings {
        let Some(price) = booking.final_price.filter(|p| *p > 0.0) else {
            continue;
        };
        summary.total += price;
        if booking.created_at >= this_month {
            summary.this_month += price;
        } else if booking.created_at >= last_month {
            summary.last_month += price;
        }
    }

    if summary.last_month > 0.0 {
        summary.growth = (summary.this_month - summary.last_month) / summary.last_month * 100.0;
    }
    summary
}

/// Booking counts per service type code.
pub fn service_breakdown(bookings: &[BookingListItem]) -> BTreeMap<u16, u64> {
    let mut counts = BTreeMap::new();
    for booking in bookings {
        *counts.entry(booking.service_type).or_insert(0) += 1;
    }
    counts
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(day: &str, price: Option<f64>, service_type: u16) -> BookingListItem {
        BookingListItem {
            id: 1,
            reference_number: "GLOHORIZON-TEST".to_string(),
            service_type,
            status: STATUS_COMPLETED,
            urgency: 1,
            created_at: format!("{}T09:00:00Z", day).parse().unwrap(),
            estimated_price: None,
            final_price: price,
            currency: "USD".to_string(),
            user: None,
        }
    }

    #[test]
    fn test_revenue_splits_by_month() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let bookings = vec![
            completed("2025-03-02", Some(300.0), 1),
            completed("2025-02-10", Some(200.0), 2),
            completed("2025-01-05", Some(1000.0), 2),
            completed("2025-03-03", None, 3),
        ];

        let summary = summarize_revenue(&bookings, now);
        assert_eq!(summary.total, 1500.0);
        assert_eq!(summary.this_month, 300.0);
        assert_eq!(summary.last_month, 200.0);
        assert_eq!(summary.growth, 50.0);
    }

    #[test]
    fn test_january_compares_with_december() {
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let bookings = vec![completed("2024-12-24", Some(400.0), 5)];
        let summary = summarize_revenue(&bookings, now);
        assert_eq!(summary.last_month, 400.0);
        assert_eq!(summary.growth, -100.0);
    }

    #[test]
    fn test_no_previous_revenue_means_zero_growth() {
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let summary = summarize_revenue(&[completed("2025-03-01", Some(10.0), 1)], now);
        assert_eq!(summary.growth, 0.0);
    }

    #[test]
    fn test_service_breakdown() {
        let bookings = vec![
            completed("2025-03-01", None, 1),
            completed("2025-03-01", None, 4),
            completed("2025-03-01", None, 1),
        ];
        let counts = service_breakdown(&bookings);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&4), Some(&1));
        assert_eq!(counts.get(&2), None);
    }
}
