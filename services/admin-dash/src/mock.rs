// services/admin-dash/src/mock.rs
//
// Built-in sample snapshot for demo mode and for degraded sections when the
// API cannot be reached.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use svckit::codes;
use svckit::types::{
    BookingDetail, BookingListItem, CustomerSummary, DashboardStats, PaymentLink,
    PaymentVerification, StatusChange,
};
use svckit::{BookingFilters, Page};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[allow(clippy::too_many_arguments)]
fn booking(
    id: u64,
    reference: &str,
    service_type: u16,
    status: u16,
    urgency: u16,
    created_at: DateTime<Utc>,
    estimated: f64,
    final_price: Option<f64>,
    name: &str,
    email: &str,
) -> BookingListItem {
    BookingListItem {
        id,
        reference_number: reference.to_string(),
        service_type,
        status,
        urgency,
        created_at,
        estimated_price: Some(estimated),
        final_price,
        currency: "USD".to_string(),
        user: Some(CustomerSummary {
            full_name: name.to_string(),
            email: email.to_string(),
            phone_number: None,
        }),
    }
}

#[rustfmt::skip]
pub fn sample_bookings() -> Vec<BookingListItem> {
    vec![
        booking(1, "GLOHORIZON-20250128-001", 1, 2, 1, at(2025, 1, 28, 10, 30), 1200.0, None, "John Doe", "john@example.com"),
        booking(2, "GLOHORIZON-20250128-002", 2, 3, 2, at(2025, 1, 28, 9, 15), 800.0, Some(750.0), "Sarah Johnson", "sarah@example.com"),
        booking(3, "GLOHORIZON-20250128-003", 5, 5, 3, at(2025, 1, 28, 8, 45), 3500.0, Some(3200.0), "Michael Chen", "michael@example.com"),
        booking(4, "GLOHORIZON-20250127-004", 4, 7, 1, at(2025, 1, 27, 16, 20), 150.0, Some(150.0), "Emma Wilson", "emma@example.com"),
        booking(5, "GLOHORIZON-20250127-005", 3, 8, 1, at(2025, 1, 27, 14, 10), 2200.0, Some(2000.0), "David Martinez", "david@example.com"),
    ]
}

pub fn sample_stats() -> DashboardStats {
    DashboardStats {
        total_bookings: 145,
        pending_bookings: 23,
        completed_bookings: 89,
        total_customers: 67,
        total_users: 0,
        recent_bookings: Vec::new(),
    }
}

pub fn sample_recent(limit: u32) -> Vec<BookingListItem> {
    let mut items = sample_bookings();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(limit as usize);
    items
}

pub fn sample_urgent() -> Vec<BookingListItem> {
    sample_bookings()
        .into_iter()
        .filter(BookingListItem::needs_attention)
        .collect()
}

/// The sample set run through the same filters the server would apply.
pub fn sample_page(filters: &BookingFilters) -> Page<BookingListItem> {
    let search = filters
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let matching: Vec<BookingListItem> = sample_bookings()
        .into_iter()
        .filter(|b| filters.status.is_empty() || filters.status.contains(&b.status))
        .filter(|b| {
            filters.service_type.is_empty() || filters.service_type.contains(&b.service_type)
        })
        .filter(|b| filters.urgency.is_empty() || filters.urgency.contains(&b.urgency))
        .filter(|b| match &search {
            Some(term) => {
                b.reference_number.to_lowercase().contains(term)
                    || b.customer_name().to_lowercase().contains(term)
                    || b.user.as_ref().is_some_and(|u| u.email.to_lowercase().contains(term))
            }
            None => true,
        })
        .collect();

    let total = matching.len() as u64;
    let size = filters.page_size.max(1) as usize;
    let skip = (filters.page.max(1) as usize - 1) * size;
    let items = matching.into_iter().skip(skip).take(size).collect();
    Page::new(items, Some(total))
}

pub fn sample_detail(id: u64) -> Option<BookingDetail> {
    let summary = sample_bookings().into_iter().find(|b| b.id == id)?;

    let travel_details = match summary.service_type {
        1 => json!({
            "from": "Accra (ACC)",
            "to": "London (LHR)",
            "departureDate": "2025-02-14",
            "passengers": 2,
            "class": "Economy"
        }),
        2 => json!({
            "city": "Dubai",
            "checkIn": "2025-02-10",
            "checkOut": "2025-02-15",
            "rooms": 1
        }),
        3 => json!({ "destination": "Cape Coast", "startDate": "2025-03-01", "groupSize": 6 }),
        4 => json!({
            "country": "United Kingdom",
            "visaType": "Tourist",
            "travelDate": "2025-03-20"
        }),
        _ => json!({
            "destination": "Zanzibar",
            "nights": 7,
            "travellers": 2,
            "includesFlights": true
        }),
    };

    let status_history = (1..=summary.status)
        .filter(|code| codes::status_info(*code).is_some())
        .take(4)
        .map(|code| StatusChange {
            status: code,
            notes: None,
            changed_at: summary.created_at + chrono::Duration::hours(i64::from(code) - 1),
            changed_by: (code > 1).then(|| "admin@glohorizon.example".to_string()),
        })
        .collect();

    Some(BookingDetail {
        travel_details: travel_details.as_object().cloned().unwrap_or_default(),
        status_history,
        admin_notes: None,
        special_requests: (summary.urgency == codes::URGENCY_EMERGENCY)
            .then(|| "Customer needs confirmation within 24 hours".to_string()),
        summary,
    })
}

pub fn sample_payment_link(id: u64) -> Option<PaymentLink> {
    let booking = sample_bookings().into_iter().find(|b| b.id == id)?;
    let amount = booking.final_price.or(booking.estimated_price)?;
    let reference = format!("GH-PAY-{:04}", id);
    Some(PaymentLink {
        payment_url: format!("https://pay.glohorizon.example/{}", reference),
        reference,
        amount,
        currency: booking.currency,
    })
}

pub fn sample_verification(reference: &str) -> PaymentVerification {
    PaymentVerification {
        reference: Some(reference.to_string()),
        status: Some("pending".to_string()),
        ..Default::default()
    }
}
