// svckit/tests/services.rs
//
// Transport and service behaviour against an in-process stub of the admin
// API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{json, Value};

use svckit::config::ApiConfig;
use svckit::http::{ApiClient, MemoryCredentialStore, Session};
use svckit::types::{PricingUpdateRequest, StatusUpdateRequest};
use svckit::{AdminApi, ApiError, BookingFilters};

const TOKEN: &str = "tok-1";

#[derive(Clone, Default)]
struct Stub {
    hits: Arc<Mutex<Vec<String>>>,
    last_query: Arc<Mutex<Option<String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl Stub {
    fn hits(&self) -> usize {
        self.hits.lock().len()
    }

    fn record(&self, what: impl Into<String>) {
        self.hits.lock().push(what.into());
    }
}

type Reply = (StatusCode, Json<Value>);

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Token expired" })),
    )
}

fn booking(id: u64) -> Value {
    json!({
        "id": id,
        "referenceNumber": format!("GLOHORIZON-20250128-{:03}", id),
        "serviceType": 1,
        "status": 2,
        "urgency": 3,
        "createdAt": "2025-01-28T10:30:00Z",
        "estimatedPrice": 1200.0,
        "user": { "fullName": "Sarah Johnson", "email": "sarah@example.com" }
    })
}

async fn login(State(stub): State<Stub>, Json(body): Json<Value>) -> Reply {
    stub.record("login");
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Login successful",
                "token": TOKEN,
                "user": {
                    "id": 1,
                    "fullName": "Ama Owusu",
                    "email": body["email"],
                    "role": "admin"
                }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid email or password" })),
        )
    }
}

async fn dashboard(State(stub): State<Stub>, headers: HeaderMap) -> Reply {
    stub.record("dashboard");
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "totalBookings": 145,
                "pendingBookings": 23,
                "completedBookings": 89,
                "totalCustomers": 67
            }
        })),
    )
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers.get("authorization")?.to_str().ok()?.strip_prefix("Bearer ")
}

async fn bookings(
    State(stub): State<Stub>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Reply {
    stub.record("bookings");
    *stub.last_query.lock() = query;
    if bearer(&headers) == Some("stale") {
        // Rejected slowly, so a newer login can land first.
        tokio::time::sleep(Duration::from_millis(300)).await;
        return unauthorized();
    }
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": [booking(1), booking(2)],
            "pagination": { "page": 1, "limit": 10, "total": 31, "totalPages": 4 }
        })),
    )
}

async fn booking_detail(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Reply {
    stub.record(format!("detail {}", id));
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Booking not found" })),
        );
    }
    let mut detail = booking(id);
    detail["travelDetails"] = json!({ "from": "ACC", "to": "LHR" });
    (StatusCode::OK, Json(json!({ "success": true, "data": detail })))
}

async fn booking_status(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Reply {
    stub.record(format!("status {}", id));
    *stub.last_body.lock() = Some(body);
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "success": true, "message": "Status updated" })))
}

async fn booking_pricing(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Reply {
    stub.record(format!("pricing {}", id));
    *stub.last_body.lock() = Some(body);
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "success": true, "message": "Pricing updated" })))
}

async fn booking_note(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Reply {
    stub.record(format!("note {}", id));
    *stub.last_body.lock() = Some(body);
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "success": true, "message": "Note added" })))
}

async fn payment_link(State(stub): State<Stub>, headers: HeaderMap, Path(id): Path<u64>) -> Reply {
    stub.record(format!("payment-link {}", id));
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "paymentUrl": "https://pay.example.com/GH-7",
                "reference": "GH-7",
                "amount": 1200.0,
                "currency": "USD"
            }
        })),
    )
}

async fn verify_payment(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Reply {
    stub.record(format!("verify {}", reference));
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": { "status": "success", "amount": 1200.0 } })),
    )
}

async fn slow() -> Reply {
    tokio::time::sleep(Duration::from_secs(5)).await;
    (StatusCode::OK, Json(json!({})))
}

async fn spawn_stub() -> (String, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/dashboard", get(dashboard))
        .route("/api/admin/bookings", get(bookings))
        .route("/api/admin/bookings/:id", get(booking_detail))
        .route("/api/admin/bookings/:id/status", put(booking_status))
        .route("/api/admin/bookings/:id/pricing", put(booking_pricing))
        .route("/api/admin/bookings/:id/notes", post(booking_note))
        .route("/api/admin/bookings/:id/payment-link", post(payment_link))
        .route("/api/payment/verify/:reference", post(verify_payment))
        .route("/api/slow", get(slow))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), stub)
}

fn config(base_url: &str, timeout_secs: u64) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs,
    }
}

fn api(base_url: &str, token: Option<&str>) -> AdminApi {
    let store = match token {
        Some(token) => MemoryCredentialStore::with_token(token),
        None => MemoryCredentialStore::new(),
    };
    let session = Arc::new(Session::new(Arc::new(store)));
    AdminApi::new(&config(base_url, 5), session).unwrap()
}

#[tokio::test]
async fn test_login_stores_token() {
    let (base, _stub) = spawn_stub().await;
    let api = api(&base, None);

    let user = api.auth.login("ama@glohorizon.example", "secret").await.unwrap();
    assert_eq!(user.full_name, "Ama Owusu");
    assert!(api.auth.is_authenticated());
    assert_eq!(api.session().token().as_deref(), Some(TOKEN));
    let email = api.auth.current_user().map(|u| u.email);
    assert_eq!(email.as_deref(), Some("ama@glohorizon.example"));

    let stats = api.dashboard.stats().await.unwrap();
    assert_eq!(stats.total_bookings, 145);

    api.auth.logout();
    assert!(!api.auth.is_authenticated());
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let (base, _stub) = spawn_stub().await;
    let api = api(&base, None);

    let err = api.auth.login("ama@glohorizon.example", "nope").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials(ref m) if m == "Invalid email or password"));
    assert!(!api.auth.is_authenticated());
}

#[tokio::test]
async fn test_empty_credentials_never_reach_server() {
    let (base, stub) = spawn_stub().await;
    let api = api(&base, None);

    let err = api.auth.login("  ", "secret").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_blocks_later_calls() {
    let (base, stub) = spawn_stub().await;
    let api = api(&base, Some("expired"));

    let err = api.bookings.list(&BookingFilters::default(), None).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!api.session().is_authenticated());
    assert_eq!(stub.hits(), 1);

    let err = api.dashboard.stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
    let err = api.bookings.detail(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated));
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn test_late_rejection_keeps_newer_login() {
    let (base, _stub) = spawn_stub().await;
    let api = api(&base, Some("stale"));

    let slow = api.clone();
    let pending =
        tokio::spawn(async move { slow.bookings.list(&BookingFilters::default(), None).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    api.auth.login("ama@glohorizon.example", "secret").await.unwrap();

    let err = pending.await.unwrap().unwrap_err();
    assert!(err.is_unauthorized());
    assert!(api.session().is_authenticated());
    assert_eq!(api.session().token().as_deref(), Some(TOKEN));

    let page = api.bookings.list(&BookingFilters::default(), None).await.unwrap();
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_validate_token() {
    let (base, _stub) = spawn_stub().await;
    assert!(api(&base, Some(TOKEN)).auth.validate_token().await.unwrap());

    let stale = api(&base, Some("expired"));
    assert!(!stale.auth.validate_token().await.unwrap());
    assert!(!stale.auth.is_authenticated());

    assert!(!api(&base, None).auth.validate_token().await.unwrap());
}

#[tokio::test]
async fn test_listing_query_carries_status_codes() {
    let (base, stub) = spawn_stub().await;
    let api = api(&base, Some(TOKEN));

    let mut filters = BookingFilters::default();
    filters.status.extend([1, 2]);
    let page = api.bookings.list(&filters, None).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, Some(31));

    let raw = stub.last_query.lock().clone().unwrap_or_default();
    assert!(!raw.contains("dateFrom"));
    assert!(!raw.contains("dateTo"));
    let sent = BookingFilters::decode(&raw);
    assert_eq!(sent.status.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(sent.page, 1);
    assert_eq!(sent.page_size, 10);
}

#[tokio::test]
async fn test_request_page_overrides_paging() {
    let (base, stub) = spawn_stub().await;
    let api = api(&base, Some(TOKEN));

    api.bookings.request_page(&BookingFilters::default(), 3, 25).await.unwrap();
    let sent = BookingFilters::decode(&stub.last_query.lock().clone().unwrap_or_default());
    assert_eq!((sent.page, sent.page_size), (3, 25));

    let err = api
        .bookings
        .request_page(&BookingFilters::default(), 1, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_recent_and_urgent_queries() {
    let (base, stub) = spawn_stub().await;
    let api = api(&base, Some(TOKEN));

    api.dashboard.recent_bookings(5).await.unwrap();
    let raw = stub.last_query.lock().clone().unwrap_or_default();
    assert!(raw.contains("pageSize=5"));
    assert!(raw.contains("sortBy=createdAt"));
    assert!(raw.contains("sortOrder=desc"));

    let urgent = api.dashboard.urgent_bookings().await.unwrap();
    assert_eq!(urgent.len(), 2);
    let sent = BookingFilters::decode(&stub.last_query.lock().clone().unwrap_or_default());
    assert_eq!(sent.urgency.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(sent.status.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_revenue_summary_reads_completed_bookings() {
    let (base, stub) = spawn_stub().await;
    let api = api(&base, Some(TOKEN));

    let now = "2025-01-30T12:00:00Z".parse().unwrap();
    let summary = api.dashboard.revenue_summary(now).await.unwrap();
    // The stub's bookings carry estimates only.
    assert_eq!(summary.total, 0.0);
    assert_eq!(summary.growth, 0.0);

    let sent = BookingFilters::decode(&stub.last_query.lock().clone().unwrap_or_default());
    assert_eq!(sent.status.iter().copied().collect::<Vec<_>>(), vec![8]);
}

#[tokio::test]
async fn test_detail_and_not_found() {
    let (base, _stub) = spawn_stub().await;
    let api = api(&base, Some(TOKEN));

    let detail = api.bookings.detail(7).await.unwrap();
    assert_eq!(detail.summary.id, 7);
    assert_eq!(detail.travel_rows().len(), 2);

    let err = api.bookings.detail(404).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(api.session().is_authenticated());
}

#[tokio::test]
async fn test_mutations() {
    let (base, stub) = spawn_stub().await;
    let api = api(&base, Some(TOKEN));

    api.bookings
        .update_status(
            7,
            &StatusUpdateRequest {
                new_status: 3,
                notes: Some("Quote sent".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        stub.last_body.lock().clone(),
        Some(json!({ "newStatus": 3, "notes": "Quote sent" }))
    );

    let pricing = PricingUpdateRequest {
        estimated_price: 1200.0,
        final_price: Some(1150.0),
        currency: "USD".to_string(),
        notes: None,
    };
    api.bookings.update_pricing(7, &pricing).await.unwrap();
    assert_eq!(
        stub.last_body.lock().clone(),
        Some(json!({ "estimatedPrice": 1200.0, "finalPrice": 1150.0, "currency": "USD" }))
    );

    let hits = stub.hits();
    let negative = PricingUpdateRequest {
        final_price: Some(-1.0),
        ..pricing
    };
    let err = api.bookings.update_pricing(7, &negative).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
    assert_eq!(stub.hits(), hits);

    api.bookings.add_note(7, "  Called customer  ").await.unwrap();
    assert_eq!(stub.last_body.lock().clone(), Some(json!({ "note": "Called customer" })));

    let hits = stub.hits();
    let err = api.bookings.add_note(7, "   ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
    assert_eq!(stub.hits(), hits);

    let link = api.bookings.generate_payment_link(7).await.unwrap();
    assert_eq!(link.reference, "GH-7");

    let verification = api.payments.verify("GH-7").await.unwrap();
    assert!(verification.is_paid());
    assert_eq!(verification.reference.as_deref(), Some("GH-7"));
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let (base, _stub) = spawn_stub().await;
    let session = Arc::new(Session::in_memory());
    let client = ApiClient::new(&config(&base, 1), session).unwrap();

    let err = client
        .send::<Value>(Method::GET, "/slow", None, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_secs(1)));
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = api(&format!("http://{}/api", addr), Some(TOKEN));
    let err = api.dashboard.stats().await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkUnavailable(_)));
    assert!(api.session().is_authenticated());
}
