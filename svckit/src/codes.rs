//! Fixed code tables for booking status, service type and urgency.
//!
//! The API transports these as small integers. Anything rendered to an
//! operator goes through [`status_badge`], [`service_badge`] or
//! [`urgency_badge`], which fall back to a distinct "unknown" badge for
//! codes outside the tables.

use serde::Serialize;

/// Colour family of a badge, mapped to concrete colours by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Gray,
    Yellow,
    Blue,
    Green,
    Orange,
    Indigo,
    Purple,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub code: u16,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub tone: Tone,
    pub editable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTypeInfo {
    pub code: u16,
    pub name: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyInfo {
    pub code: u16,
    pub name: &'static str,
    pub icon: &'static str,
    pub response_time: &'static str,
    pub tone: Tone,
    pub alert: bool,
}

pub const STATUS_PENDING: u16 = 1;
pub const STATUS_UNDER_REVIEW: u16 = 2;
pub const STATUS_COMPLETED: u16 = 8;

pub const URGENCY_URGENT: u16 = 2;
pub const URGENCY_EMERGENCY: u16 = 3;

#[rustfmt::skip]
pub const BOOKING_STATUSES: [StatusInfo; 10] = [
    StatusInfo { code: 1, name: "Pending", icon: "⏳", description: "New booking awaiting review", tone: Tone::Gray, editable: true },
    StatusInfo { code: 2, name: "Under Review", icon: "👀", description: "Admin is researching options", tone: Tone::Yellow, editable: true },
    StatusInfo { code: 3, name: "Quote Ready", icon: "📋", description: "Quote prepared for customer", tone: Tone::Blue, editable: true },
    StatusInfo { code: 4, name: "Quote Accepted", icon: "✅", description: "Customer accepted the quote", tone: Tone::Green, editable: true },
    StatusInfo { code: 5, name: "Payment Pending", icon: "💳", description: "Awaiting customer payment", tone: Tone::Orange, editable: false },
    StatusInfo { code: 6, name: "Processing", icon: "⚙", description: "Booking services with suppliers", tone: Tone::Indigo, editable: true },
    StatusInfo { code: 7, name: "Confirmed", icon: "🛡", description: "All services confirmed", tone: Tone::Green, editable: true },
    StatusInfo { code: 8, name: "Completed", icon: "🎉", description: "Travel completed successfully", tone: Tone::Green, editable: false },
    StatusInfo { code: 9, name: "Cancelled", icon: "❌", description: "Booking cancelled", tone: Tone::Red, editable: false },
    StatusInfo { code: 10, name: "Rejected", icon: "⛔", description: "Quote rejected by customer", tone: Tone::Red, editable: true },
];

#[rustfmt::skip]
pub const SERVICE_TYPES: [ServiceTypeInfo; 5] = [
    ServiceTypeInfo { code: 1, name: "Flight", icon: "✈", tone: Tone::Blue },
    ServiceTypeInfo { code: 2, name: "Hotel", icon: "🏨", tone: Tone::Green },
    ServiceTypeInfo { code: 3, name: "Tour", icon: "🗺", tone: Tone::Purple },
    ServiceTypeInfo { code: 4, name: "Visa", icon: "📄", tone: Tone::Orange },
    ServiceTypeInfo { code: 5, name: "Complete Package", icon: "📦", tone: Tone::Indigo },
];

#[rustfmt::skip]
pub const URGENCY_LEVELS: [UrgencyInfo; 3] = [
    UrgencyInfo { code: 1, name: "Standard", icon: "🕐", response_time: "4-8 hours", tone: Tone::Green, alert: false },
    UrgencyInfo { code: 2, name: "Urgent", icon: "⚡", response_time: "2-4 hours", tone: Tone::Orange, alert: false },
    UrgencyInfo { code: 3, name: "Emergency", icon: "🚨", response_time: "1 hour", tone: Tone::Red, alert: true },
];

pub fn status_info(code: u16) -> Option<&'static StatusInfo> {
    BOOKING_STATUSES.iter().find(|s| s.code == code)
}

pub fn service_type_info(code: u16) -> Option<&'static ServiceTypeInfo> {
    SERVICE_TYPES.iter().find(|s| s.code == code)
}

pub fn urgency_info(code: u16) -> Option<&'static UrgencyInfo> {
    URGENCY_LEVELS.iter().find(|u| u.code == code)
}

/// Renderable label for a code, already resolved against its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub icon: &'static str,
    pub tone: Tone,
    pub known: bool,
    /// Emergency urgency blinks in the view.
    pub alert: bool,
}

impl Badge {
    fn unknown(label: &str) -> Self {
        Self {
            label: label.to_string(),
            icon: "?",
            tone: Tone::Gray,
            known: false,
            alert: false,
        }
    }
}

pub fn status_badge(code: u16) -> Badge {
    match status_info(code) {
        Some(info) => Badge {
            label: info.name.to_string(),
            icon: info.icon,
            tone: info.tone,
            known: true,
            alert: false,
        },
        None => Badge::unknown("Unknown Status"),
    }
}

pub fn service_badge(code: u16) -> Badge {
    match service_type_info(code) {
        Some(info) => Badge {
            label: info.name.to_string(),
            icon: info.icon,
            tone: info.tone,
            known: true,
            alert: false,
        },
        None => Badge::unknown("Unknown Service"),
    }
}

pub fn urgency_badge(code: u16) -> Badge {
    match urgency_info(code) {
        Some(info) => Badge {
            label: info.name.to_string(),
            icon: info.icon,
            tone: info.tone,
            known: true,
            alert: info.alert,
        },
        None => Badge::unknown("Unknown Urgency"),
    }
}

/// Urgent or emergency booking still waiting on an admin.
pub fn needs_attention(status: u16, urgency: u16) -> bool {
    matches!(urgency, URGENCY_URGENT | URGENCY_EMERGENCY)
        && matches!(status, STATUS_PENDING | STATUS_UNDER_REVIEW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_contiguous() {
        for (i, s) in BOOKING_STATUSES.iter().enumerate() {
            assert_eq!(s.code as usize, i + 1);
        }
        for (i, s) in SERVICE_TYPES.iter().enumerate() {
            assert_eq!(s.code as usize, i + 1);
        }
        for (i, u) in URGENCY_LEVELS.iter().enumerate() {
            assert_eq!(u.code as usize, i + 1);
        }
    }

    #[test]
    fn test_known_badges() {
        assert_eq!(status_badge(8).label, "Completed");
        assert_eq!(service_badge(5).label, "Complete Package");

        let emergency = urgency_badge(3);
        assert_eq!(emergency.label, "Emergency");
        assert!(emergency.alert);
        assert!(emergency.known);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let badge = status_badge(11);
        assert!(!badge.known);
        assert_eq!(badge.label, "Unknown Status");
        assert_eq!(badge.tone, Tone::Gray);

        assert!(!service_badge(0).known);
        assert_eq!(urgency_badge(9).label, "Unknown Urgency");
    }

    #[test]
    fn test_needs_attention() {
        assert!(needs_attention(1, 3));
        assert!(needs_attention(2, 2));
        assert!(!needs_attention(5, 3));
        assert!(!needs_attention(1, 1));
    }
}
