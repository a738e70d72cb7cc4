// svckit/src/services/mod.rs
//
// Resource services over the admin REST API. One shared ApiClient (and with
// it one Session) backs all of them.

pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod payments;

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::http::{ApiClient, Session};

pub use auth::AuthService;
pub use bookings::BookingService;
pub use dashboard::{DashboardService, RevenueSummary};
pub use payments::PaymentService;

/// Facade handed to the view layer. Cloning is cheap.
#[derive(Clone)]
pub struct AdminApi {
    pub auth: AuthService,
    pub bookings: BookingService,
    pub dashboard: DashboardService,
    pub payments: PaymentService,
    client: Arc<ApiClient>,
}

impl AdminApi {
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let client = Arc::new(ApiClient::new(config, session)?);
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Arc<ApiClient>) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            bookings: BookingService::new(client.clone()),
            dashboard: DashboardService::new(client.clone()),
            payments: PaymentService::new(client.clone()),
            client,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }
}

/// Outcome policy shared by every protected operation: log the failure.
/// Credentials rejected with a 401 were already dropped by the transport.
pub(crate) fn settle<T>(operation: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    match &result {
        Ok(_) => {}
        Err(ApiError::Unauthenticated) => {
            debug!("{} skipped: not authenticated", operation);
        }
        Err(e @ ApiError::Http { status: 401, .. }) => {
            warn!("{} rejected: {}", operation, e);
        }
        Err(e) => {
            error!("{} failed: {}", operation, e);
        }
    }
    result
}
