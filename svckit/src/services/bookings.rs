use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::filters::{BookingFilters, Sort};
use crate::http::ApiClient;
use crate::pagination::Page;
use crate::services::settle;
use crate::types::{
    BookingDetail, BookingListItem, NoteRequest, PaymentLink, PricingUpdateRequest,
    StatusUpdateRequest,
};

#[derive(Clone)]
pub struct BookingService {
    client: Arc<ApiClient>,
}

impl BookingService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch the page of bookings described by `filters` (including its
    /// `page`/`page_size`).
    pub async fn list(
        &self,
        filters: &BookingFilters,
        sort: Option<&Sort>,
    ) -> Result<Page<BookingListItem>, ApiError> {
        if filters.page_size == 0 {
            return Err(ApiError::InvalidArgument("pageSize must be positive".to_string()));
        }

        let query = filters.request_pairs(sort);
        let result = self.client.get::<Value>("/admin/bookings", &query).await;
        let page = parse_listing(settle("list bookings", result)?)?;

        debug!(
            items = page.items.len(),
            total = ?page.total,
            page = filters.page,
            "Fetched bookings page"
        );
        Ok(page)
    }

    /// Same filters, explicit page coordinates.
    pub async fn request_page(
        &self,
        filters: &BookingFilters,
        page: u32,
        page_size: u32,
    ) -> Result<Page<BookingListItem>, ApiError> {
        let mut filters = filters.clone();
        filters.page = page.max(1);
        filters.page_size = page_size;
        self.list(&filters, None).await
    }

    pub async fn detail(&self, id: u64) -> Result<BookingDetail, ApiError> {
        let path = format!("/admin/bookings/{}", id);
        let result = self
            .client
            .get::<Option<BookingDetail>>(&path, &[])
            .await
            .map_err(|e| match e {
                ApiError::Http { status: 404, .. } => {
                    ApiError::NotFound(format!("booking {}", id))
                }
                other => other,
            });

        settle("booking detail", result)?
            .ok_or_else(|| ApiError::NotFound(format!("booking {}", id)))
    }

    pub async fn update_status(
        &self,
        id: u64,
        request: &StatusUpdateRequest,
    ) -> Result<(), ApiError> {
        let path = format!("/admin/bookings/{}/status", id);
        let result = self.client.put::<Value, _>(&path, request).await;
        settle("update booking status", result)?;
        info!("Booking {} moved to status {}", id, request.new_status);
        Ok(())
    }

    pub async fn update_pricing(
        &self,
        id: u64,
        request: &PricingUpdateRequest,
    ) -> Result<(), ApiError> {
        if request.estimated_price < 0.0 || request.final_price.is_some_and(|p| p < 0.0) {
            return Err(ApiError::InvalidArgument("prices cannot be negative".to_string()));
        }

        let path = format!("/admin/bookings/{}/pricing", id);
        let result = self.client.put::<Value, _>(&path, request).await;
        settle("update booking pricing", result)?;
        info!("Booking {} repriced", id);
        Ok(())
    }

    pub async fn add_note(&self, id: u64, note: &str) -> Result<(), ApiError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(ApiError::InvalidArgument("note cannot be empty".to_string()));
        }

        let path = format!("/admin/bookings/{}/notes", id);
        let body = NoteRequest {
            note: note.to_string(),
        };
        let result = self.client.post::<Value, _>(&path, Some(&body)).await;
        settle("add booking note", result)?;
        info!("Note added to booking {}", id);
        Ok(())
    }

    pub async fn generate_payment_link(&self, id: u64) -> Result<PaymentLink, ApiError> {
        let path = format!("/admin/bookings/{}/payment-link", id);
        let result = self
            .client
            .post::<Option<PaymentLink>, ()>(&path, None)
            .await;

        let link = settle("generate payment link", result)?.ok_or_else(|| {
            ApiError::InvalidResponseShape("payment link response had no data".to_string())
        })?;
        info!("Payment link {} issued for booking {}", link.reference, id);
        Ok(link)
    }
}

/// Accepts a bare array, or an object carrying the items under `bookings`,
/// `items` or `data` with the total under `total`, `totalCount` or
/// `pagination.total`.
pub(crate) fn parse_listing(value: Value) -> Result<Page<BookingListItem>, ApiError> {
    match value {
        Value::Array(_) => Ok(Page::new(serde_json::from_value(value)?, None)),
        Value::Object(mut map) => {
            let items = ["bookings", "items", "data"]
                .iter()
                .find_map(|key| map.remove(*key))
                .ok_or_else(|| {
                    ApiError::InvalidResponseShape("listing has no bookings array".to_string())
                })?;

            let total = map
                .get("total")
                .or_else(|| map.get("totalCount"))
                .or_else(|| map.get("pagination").and_then(|p| p.get("total")))
                .and_then(Value::as_u64);

            Ok(Page::new(serde_json::from_value(items)?, total))
        }
        Value::Null => Ok(Page::new(Vec::new(), None)),
        other => Err(ApiError::InvalidResponseShape(format!(
            "unexpected listing payload: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: u64) -> Value {
        json!({
            "id": id,
            "referenceNumber": format!("GLOHORIZON-20250128-{:03}", id),
            "serviceType": 1,
            "status": 1,
            "urgency": 1,
            "createdAt": "2025-01-28T10:30:00Z"
        })
    }

    #[test]
    fn test_bare_array_has_no_total() {
        let page = parse_listing(json!([item(1), item(2)])).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, None);
        assert_eq!(page.total_or_len(), 2);
    }

    #[test]
    fn test_total_sources() {
        let listing = json!({ "bookings": [item(1)], "pagination": { "total": 42 } });
        let page = parse_listing(listing).unwrap();
        assert_eq!(page.total, Some(42));

        let page = parse_listing(json!({ "items": [item(1)], "totalCount": 7 })).unwrap();
        assert_eq!(page.total, Some(7));

        let page = parse_listing(json!({ "data": [item(1)], "total": 3 })).unwrap();
        assert_eq!(page.total, Some(3));
        assert_eq!(page.items[0].id, 1);
    }

    #[test]
    fn test_null_is_empty_page() {
        let page = parse_listing(Value::Null).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_unexpected_shapes() {
        assert!(matches!(
            parse_listing(json!({ "count": 1 })),
            Err(ApiError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            parse_listing(json!("bookings")),
            Err(ApiError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            parse_listing(json!([{ "id": "x" }])),
            Err(ApiError::InvalidResponseShape(_))
        ));
    }
}
