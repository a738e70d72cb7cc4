use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codes;

fn default_currency() -> String {
    "USD".to_string()
}

/// Customer summary embedded in booking projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Read projection returned by the listing endpoint. Never built by the
/// client except for the offline sample snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListItem {
    pub id: u64,
    pub reference_number: String,
    pub service_type: u16,
    pub status: u16,
    pub urgency: u16,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub estimated_price: Option<f64>,
    #[serde(default)]
    pub final_price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub user: Option<CustomerSummary>,
}

impl BookingListItem {
    pub fn customer_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.full_name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("N/A")
    }

    /// Final price when set, otherwise the estimate marked as such.
    pub fn price_label(&self) -> String {
        match (self.final_price, self.estimated_price) {
            (Some(price), _) => format_money(price, &self.currency),
            (None, Some(estimate)) => format!("~{}", format_money(estimate, &self.currency)),
            (None, None) => "Pending".to_string(),
        }
    }

    pub fn needs_attention(&self) -> bool {
        codes::needs_attention(self.status, self.urgency)
    }

    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        time_ago(self.created_at, now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    #[serde(alias = "newStatus")]
    pub status: u16,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(alias = "createdAt")]
    pub changed_at: DateTime<Utc>,
    #[serde(default)]
    pub changed_by: Option<String>,
}

/// Full booking record from `GET /admin/bookings/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    #[serde(flatten)]
    pub summary: BookingListItem,
    #[serde(default)]
    pub travel_details: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl BookingDetail {
    /// Travel details flattened to printable `key: value` rows.
    pub fn travel_rows(&self) -> Vec<(String, String)> {
        self.travel_details
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => "-".to_string(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }
}

/// Aggregate snapshot from `GET /admin/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_bookings: u64,
    #[serde(default)]
    pub pending_bookings: u64,
    #[serde(default)]
    pub completed_bookings: u64,
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub recent_bookings: Vec<BookingListItem>,
}

impl DashboardStats {
    /// Some deployments only report `totalUsers`.
    pub fn customer_count(&self) -> u64 {
        if self.total_customers > 0 {
            self.total_customers
        } else {
            self.total_users
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AdminUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub new_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingUpdateRequest {
    pub estimated_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteRequest {
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub payment_url: String,
    pub reference: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentVerification {
    pub fn is_paid(&self) -> bool {
        matches!(
            self.status.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("success" | "paid" | "completed")
        )
    }
}

/// `USD 1,200.00`
pub fn format_money(amount: f64, currency: &str) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{} {}{}.{:02}", currency, sign, grouped, cents % 100)
}

pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours();
    match hours {
        h if h < 1 => "Just now".to_string(),
        1 => "1 hour ago".to_string(),
        h if h < 24 => format!("{} hours ago", h),
        h if h / 24 == 1 => "1 day ago".to_string(),
        h => format!("{} days ago", h / 24),
    }
}
