// services/admin-dash/src/api.rs
//
// Runs API calls as tokio tasks and reports results back to the UI thread
// over an mpsc channel. Demo mode answers from the sample snapshot instead.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use svckit::http::Ticket;
use svckit::types::{
    AdminUser, BookingDetail, BookingListItem, DashboardStats, PaymentLink, PaymentVerification,
};
use svckit::{AdminApi, ApiError, BookingFilters, Page};

use crate::mock;
use crate::state::{AppState, Command};

/// Result of one API call, tagged with the ticket it was issued under.
#[derive(Debug)]
pub enum ApiEvent {
    Stats(Ticket, Result<DashboardStats, ApiError>),
    Recent(Ticket, Result<Vec<BookingListItem>, ApiError>),
    Urgent(Ticket, Result<Vec<BookingListItem>, ApiError>),
    Bookings(Ticket, BookingFilters, Result<Page<BookingListItem>, ApiError>),
    Detail(Ticket, Result<BookingDetail, ApiError>),
    LoggedIn(Result<AdminUser, ApiError>),
    NoteAdded(u64, Result<(), ApiError>),
    PaymentLink(u64, Result<PaymentLink, ApiError>),
    PaymentVerified(String, Result<PaymentVerification, ApiError>),
}

pub enum Backend {
    Live(AdminApi),
    Demo,
}

pub struct Dispatcher {
    backend: Backend,
    runtime: Handle,
    tx: UnboundedSender<ApiEvent>,
}

impl Dispatcher {
    pub fn new(backend: Backend, runtime: Handle) -> (Self, UnboundedReceiver<ApiEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { backend, runtime, tx }, rx)
    }

    /// Start the work behind `command`. Loading flags and tickets are taken
    /// from `state` before anything is spawned.
    pub fn execute(&self, command: Command, state: &mut AppState) {
        match command {
            Command::LoadDashboard => self.load_dashboard(state),
            Command::LoadBookings => self.load_bookings(state),
            Command::LoadDetail(id) => self.load_detail(id, state),
            Command::Login { email, password } => self.login(email, password),
            Command::Logout => {
                if let Backend::Live(api) = &self.backend {
                    api.auth.logout();
                }
                info!("Operator signed out");
                state.require_login(None);
            }
            Command::AddNote { id, note } => match &self.backend {
                Backend::Live(api) => {
                    let api = api.clone();
                    self.spawn(
                        async move { api.bookings.add_note(id, &note).await },
                        move |r| ApiEvent::NoteAdded(id, r),
                    );
                }
                Backend::Demo => self.send(ApiEvent::NoteAdded(id, Ok(()))),
            },
            Command::GeneratePaymentLink(id) => match &self.backend {
                Backend::Live(api) => {
                    let api = api.clone();
                    self.spawn(
                        async move { api.bookings.generate_payment_link(id).await },
                        move |r| ApiEvent::PaymentLink(id, r),
                    );
                }
                Backend::Demo => {
                    let result = mock::sample_payment_link(id).ok_or_else(|| {
                        ApiError::Validation("booking has no price yet".to_string())
                    });
                    self.send(ApiEvent::PaymentLink(id, result));
                }
            },
            Command::VerifyPayment(reference) => match &self.backend {
                Backend::Live(api) => {
                    let api = api.clone();
                    let tag = reference.clone();
                    self.spawn(
                        async move { api.payments.verify(&reference).await },
                        move |r| ApiEvent::PaymentVerified(tag, r),
                    );
                }
                Backend::Demo => {
                    let verification = mock::sample_verification(&reference);
                    self.send(ApiEvent::PaymentVerified(reference, Ok(verification)));
                }
            },
            Command::Quit => {}
        }
    }

    /// Stats, recent and urgent bookings are fetched independently; each
    /// lands in its own section whenever it completes.
    fn load_dashboard(&self, state: &mut AppState) {
        let stats_ticket = state.stats.begin();
        let recent_ticket = state.recent.begin();
        let urgent_ticket = state.urgent.begin();
        let limit = state.recent_limit;

        match &self.backend {
            Backend::Live(api) => {
                let a = api.clone();
                self.spawn(async move { a.dashboard.stats().await }, move |r| {
                    ApiEvent::Stats(stats_ticket, r)
                });
                let a = api.clone();
                self.spawn(async move { a.dashboard.recent_bookings(limit).await }, move |r| {
                    ApiEvent::Recent(recent_ticket, r)
                });
                let a = api.clone();
                self.spawn(async move { a.dashboard.urgent_bookings().await }, move |r| {
                    ApiEvent::Urgent(urgent_ticket, r)
                });
            }
            Backend::Demo => {
                self.send(ApiEvent::Stats(stats_ticket, Ok(mock::sample_stats())));
                self.send(ApiEvent::Recent(recent_ticket, Ok(mock::sample_recent(limit))));
                self.send(ApiEvent::Urgent(urgent_ticket, Ok(mock::sample_urgent())));
            }
        }
    }

    fn load_bookings(&self, state: &mut AppState) {
        let ticket = state.bookings.begin();
        let filters = state.filters.clone();
        debug!(query = %filters.encode(), "Loading bookings");

        match &self.backend {
            Backend::Live(api) => {
                let api = api.clone();
                let tag = filters.clone();
                self.spawn(
                    async move { api.bookings.list(&filters, None).await },
                    move |r| ApiEvent::Bookings(ticket, tag, r),
                );
            }
            Backend::Demo => {
                let page = mock::sample_page(&filters);
                self.send(ApiEvent::Bookings(ticket, filters, Ok(page)));
            }
        }
    }

    fn load_detail(&self, id: u64, state: &mut AppState) {
        let ticket = state.detail.begin();
        match &self.backend {
            Backend::Live(api) => {
                let api = api.clone();
                self.spawn(async move { api.bookings.detail(id).await }, move |r| {
                    ApiEvent::Detail(ticket, r)
                });
            }
            Backend::Demo => {
                let result = mock::sample_detail(id)
                    .ok_or_else(|| ApiError::NotFound(format!("booking {}", id)));
                self.send(ApiEvent::Detail(ticket, result));
            }
        }
    }

    fn login(&self, email: String, password: String) {
        match &self.backend {
            Backend::Live(api) => {
                let api = api.clone();
                self.spawn(
                    async move { api.auth.login(&email, &password).await },
                    ApiEvent::LoggedIn,
                );
            }
            Backend::Demo => {
                let user = AdminUser {
                    id: None,
                    full_name: "Demo Admin".to_string(),
                    email,
                    role: Some("admin".to_string()),
                };
                self.send(ApiEvent::LoggedIn(Ok(user)));
            }
        }
    }

    fn spawn<T, F, M>(&self, call: F, tag: M)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
        M: FnOnce(Result<T, ApiError>) -> ApiEvent + Send + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = call.await;
            // The receiver only goes away when the UI is shutting down.
            let _ = tx.send(tag(result));
        });
    }

    fn send(&self, event: ApiEvent) {
        let _ = self.tx.send(event);
    }
}
