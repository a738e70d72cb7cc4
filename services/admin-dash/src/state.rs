// services/admin-dash/src/state.rs
//
// Dashboard state: current screen, independently loaded sections, booking
// filters and the activity log. Owned by the UI thread; API results arrive
// as ApiEvents and are applied here.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use svckit::codes;
use svckit::http::{RequestGeneration, Ticket};
use svckit::types::{
    AdminUser, BookingDetail, BookingListItem, DashboardStats, PaymentLink, PaymentVerification,
};
use svckit::{compute_window, ApiError, BookingFilters, Page, PageWindow};

use crate::api::ApiEvent;
use crate::mock;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Bookings,
    Detail(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Note,
    PaymentReference,
    DateFrom,
    DateTo,
    PickStatus,
    PickService,
    PickUrgency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Work the event loop must hand to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadDashboard,
    LoadBookings,
    LoadDetail(u64),
    Login { email: String, password: String },
    Logout,
    AddNote { id: u64, note: String },
    GeneratePaymentLink(u64),
    VerifyPayment(String),
    Quit,
}

/// One independently loaded part of a screen with its own loading and
/// error state.
#[derive(Debug)]
pub struct Section<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// `data` is the built-in sample rather than server data.
    pub sample: bool,
    generation: RequestGeneration,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            sample: false,
            generation: RequestGeneration::new(),
        }
    }
}

impl<T> Section<T> {
    pub fn begin(&mut self) -> Ticket {
        self.loading = true;
        self.generation.begin()
    }

    /// False when a newer request for this section has been issued since.
    fn accept(&mut self, ticket: Ticket, what: &str) -> bool {
        if !self.generation.is_current(ticket) {
            debug!("Dropping superseded {} response (ticket {})", what, ticket.value());
            return false;
        }
        self.loading = false;
        true
    }

    fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.error = None;
        self.sample = false;
    }

    fn fail(&mut self, message: String, fallback: Option<T>) {
        self.error = Some(message);
        if let Some(fallback) = fallback {
            self.data = Some(fallback);
            self.sample = true;
        }
    }

    fn reset(&mut self) {
        self.generation.invalidate();
        self.data = None;
        self.loading = false;
        self.error = None;
        self.sample = false;
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, level: &str, message: &str) {
        self.entries.push_back(LogEntry {
            timestamp: Local::now(),
            level: level.to_string(),
            message: message.to_string(),
        });
        while self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }
}

#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub field: LoginField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            field: LoginField::Email,
            error: None,
            submitting: false,
        }
    }
}

pub struct AppState {
    pub screen: Screen,
    /// Where login and `Esc` from the detail screen lead.
    pub home: Screen,
    pub demo: bool,
    pub api_url: String,
    pub user: Option<AdminUser>,

    pub stats: Section<DashboardStats>,
    pub recent: Section<Vec<BookingListItem>>,
    pub urgent: Section<Vec<BookingListItem>>,
    pub bookings: Section<Page<BookingListItem>>,
    pub detail: Section<BookingDetail>,

    pub filters: BookingFilters,
    pub recent_limit: u32,
    pub selected: usize,

    pub payment_link: Option<PaymentLink>,
    pub verification: Option<PaymentVerification>,
    pub notice: Option<String>,

    pub input: InputMode,
    pub input_buffer: String,
    pub login: LoginForm,

    pub activity_log: ActivityLog,
    pub request_totals: (u64, u64),
}

impl AppState {
    pub fn new(api_url: &str, filters: BookingFilters, recent_limit: u32, demo: bool) -> Self {
        Self {
            screen: Screen::Login,
            home: Screen::Dashboard,
            demo,
            api_url: api_url.to_string(),
            user: None,
            stats: Section::default(),
            recent: Section::default(),
            urgent: Section::default(),
            bookings: Section::default(),
            detail: Section::default(),
            filters,
            recent_limit,
            selected: 0,
            payment_link: None,
            verification: None,
            notice: None,
            input: InputMode::Normal,
            input_buffer: String::new(),
            login: LoginForm::default(),
            activity_log: ActivityLog::default(),
            request_totals: (0, 0),
        }
    }

    pub fn add_log(&mut self, level: &str, message: &str) {
        self.activity_log.push(level, message);
    }

    /// Enter the signed-in part of the app and say what to load first.
    pub fn enter(&mut self, user: Option<AdminUser>) -> Command {
        self.user = user;
        self.login = LoginForm::default();
        self.screen = self.home;
        self.selected = 0;
        self.load_command()
    }

    /// Back to the login screen after a 401 or an explicit logout.
    pub fn require_login(&mut self, reason: Option<&str>) {
        self.screen = Screen::Login;
        self.user = None;
        self.input = InputMode::Normal;
        self.input_buffer.clear();
        self.login = LoginForm {
            error: reason.map(str::to_string),
            ..LoginForm::default()
        };
        self.stats.reset();
        self.recent.reset();
        self.urgent.reset();
        self.bookings.reset();
        self.detail.reset();
        self.add_log("WARN", reason.unwrap_or("Signed out"));
    }

    /// Refresh command for the current screen.
    pub fn load_command(&self) -> Command {
        match self.screen {
            Screen::Bookings => Command::LoadBookings,
            Screen::Detail(id) => Command::LoadDetail(id),
            Screen::Dashboard | Screen::Login => Command::LoadDashboard,
        }
    }

    /// Rows of the list shown on the current screen.
    pub fn rows(&self) -> &[BookingListItem] {
        match self.screen {
            Screen::Dashboard => self.recent.data.as_deref().unwrap_or(&[]),
            Screen::Bookings => self
                .bookings
                .data
                .as_ref()
                .map(|p| p.items.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn selected_booking(&self) -> Option<&BookingListItem> {
        self.rows().get(self.selected)
    }

    /// Window over the current bookings result. Without a server total the
    /// count is extrapolated from the page we are on.
    pub fn bookings_window(&self) -> Option<PageWindow> {
        let page = self.bookings.data.as_ref()?;
        let total = match page.total {
            Some(total) => total,
            None => {
                u64::from(self.filters.page.saturating_sub(1)) * u64::from(self.filters.page_size)
                    + page.items.len() as u64
            }
        };
        compute_window(self.filters.page, self.filters.page_size, total).ok()
    }

    pub fn can_go_next(&self) -> bool {
        match (self.bookings_window(), self.bookings.data.as_ref()) {
            (Some(window), Some(page)) => {
                window.has_next()
                    || (page.is_total_estimated()
                        && page.items.len() as u64 == u64::from(self.filters.page_size))
            }
            _ => false,
        }
    }

    /// Bookings in the urgent section that still need an admin.
    pub fn attention_count(&self) -> usize {
        self.urgent
            .data
            .as_ref()
            .map(|items| items.iter().filter(|b| b.needs_attention()).count())
            .unwrap_or(0)
    }

    pub fn apply(&mut self, event: ApiEvent) -> Option<Command> {
        match event {
            ApiEvent::Stats(ticket, result) => {
                if !self.stats.accept(ticket, "stats") {
                    return None;
                }
                match result {
                    Ok(stats) => self.stats.succeed(stats),
                    Err(e) if e.is_unauthorized() => self.session_expired(),
                    Err(e) => {
                        let sample = Some(mock::sample_stats());
                        let log = &mut self.activity_log;
                        degrade(&mut self.stats, log, "Dashboard stats", &e, sample)
                    }
                }
            }
            ApiEvent::Recent(ticket, result) => {
                if !self.recent.accept(ticket, "recent bookings") {
                    return None;
                }
                match result {
                    Ok(items) => {
                        self.recent.succeed(items);
                        self.clamp_selection();
                    }
                    Err(e) if e.is_unauthorized() => self.session_expired(),
                    Err(e) => {
                        let sample = mock::sample_recent(self.recent_limit);
                        let log = &mut self.activity_log;
                        degrade(&mut self.recent, log, "Recent bookings", &e, Some(sample));
                        self.clamp_selection();
                    }
                }
            }
            ApiEvent::Urgent(ticket, result) => {
                if !self.urgent.accept(ticket, "urgent bookings") {
                    return None;
                }
                match result {
                    Ok(items) => {
                        if !items.is_empty() {
                            let message = format!("{} urgent bookings need attention", items.len());
                            self.add_log("WARN", &message);
                        }
                        self.urgent.succeed(items);
                    }
                    Err(e) if e.is_unauthorized() => self.session_expired(),
                    Err(e) => {
                        let sample = Some(mock::sample_urgent());
                        let log = &mut self.activity_log;
                        degrade(&mut self.urgent, log, "Urgent bookings", &e, sample)
                    }
                }
            }
            ApiEvent::Bookings(ticket, requested, result) => {
                if !self.bookings.accept(ticket, "bookings") {
                    return None;
                }
                match result {
                    Ok(page) => return self.apply_bookings_page(&requested, page),
                    Err(e) if e.is_unauthorized() => self.session_expired(),
                    Err(e) => {
                        let sample = mock::sample_page(&requested);
                        let log = &mut self.activity_log;
                        degrade(&mut self.bookings, log, "Bookings", &e, Some(sample));
                        self.clamp_selection();
                    }
                }
            }
            ApiEvent::Detail(ticket, result) => {
                if !self.detail.accept(ticket, "booking detail") {
                    return None;
                }
                match result {
                    Ok(detail) => self.detail.succeed(detail),
                    Err(e) if e.is_unauthorized() => self.session_expired(),
                    Err(e) => {
                        let fallback = match self.screen {
                            Screen::Detail(id) if e.is_unreachable() => mock::sample_detail(id),
                            _ => None,
                        };
                        let log = &mut self.activity_log;
                        degrade(&mut self.detail, log, "Booking detail", &e, fallback);
                    }
                }
            }
            ApiEvent::LoggedIn(result) => {
                self.login.submitting = false;
                match result {
                    Ok(user) => {
                        self.add_log("INFO", &format!("Signed in as {}", user.email));
                        return Some(self.enter(Some(user)));
                    }
                    Err(e) => {
                        self.login.password.clear();
                        self.login.field = LoginField::Password;
                        self.login.error = Some(e.user_message());
                        self.add_log("ERROR", &format!("Login failed: {}", e.user_message()));
                    }
                }
            }
            ApiEvent::NoteAdded(id, result) => match result {
                Ok(()) => {
                    self.notice = Some("Note added".to_string());
                    self.add_log("INFO", &format!("Note added to booking {}", id));
                    if self.screen == Screen::Detail(id) {
                        return Some(Command::LoadDetail(id));
                    }
                }
                Err(e) => self.action_failed("Add note", &e),
            },
            ApiEvent::PaymentLink(id, result) => match result {
                Ok(link) => {
                    self.notice = Some(format!("Payment link: {}", link.payment_url));
                    let message =
                        format!("Payment link {} generated for booking {}", link.reference, id);
                    self.add_log("INFO", &message);
                    self.payment_link = Some(link);
                }
                Err(e) => self.action_failed("Generate payment link", &e),
            },
            ApiEvent::PaymentVerified(reference, result) => match result {
                Ok(verification) => {
                    let status =
                        verification.status.clone().unwrap_or_else(|| "unknown".to_string());
                    self.notice = Some(format!("Payment {}: {}", reference, status));
                    self.add_log(
                        if verification.is_paid() { "INFO" } else { "WARN" },
                        &format!("Payment {} is {}", reference, status),
                    );
                    self.verification = Some(verification);
                }
                Err(e) => self.action_failed("Verify payment", &e),
            },
        }
        None
    }

    fn apply_bookings_page(
        &mut self,
        requested: &BookingFilters,
        page: Page<BookingListItem>,
    ) -> Option<Command> {
        // Ignore pages for filters the operator has since changed.
        if requested != &self.filters {
            return None;
        }

        if let Some(total) = page.total.filter(|t| *t > 0) {
            if let Ok(window) = compute_window(requested.page, requested.page_size, total) {
                if window.page != requested.page {
                    let message = format!(
                        "Page {} is past the end, showing page {}",
                        requested.page, window.page
                    );
                    self.add_log("INFO", &message);
                    self.filters.page = window.page;
                    self.bookings.succeed(page);
                    return Some(Command::LoadBookings);
                }
            }
        }

        self.add_log(
            "INFO",
            &format!("Loaded {} bookings (page {})", page.items.len(), requested.page),
        );
        self.bookings.succeed(page);
        self.clamp_selection();
        None
    }

    fn session_expired(&mut self) {
        if self.screen != Screen::Login {
            self.require_login(Some("Session expired - please log in again"));
        }
    }

    fn action_failed(&mut self, what: &str, err: &ApiError) {
        if err.is_unauthorized() {
            self.session_expired();
            return;
        }
        self.notice = Some(format!("{} failed: {}", what, err.user_message()));
        self.add_log("ERROR", &format!("{} failed: {}", what, err));
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }
        match (self.screen, self.input) {
            (Screen::Login, _) => self.login_key(key.code),
            (_, InputMode::Normal) => self.normal_key(key.code),
            _ => self.input_key(key.code),
        }
    }

    fn login_key(&mut self, code: KeyCode) -> Option<Command> {
        if self.login.submitting {
            return None;
        }
        match code {
            KeyCode::Esc => return Some(Command::Quit),
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.login.field = match self.login.field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Backspace => {
                match self.login.field {
                    LoginField::Email => self.login.email.pop(),
                    LoginField::Password => self.login.password.pop(),
                };
            }
            KeyCode::Char(c) => match self.login.field {
                LoginField::Email => self.login.email.push(c),
                LoginField::Password => self.login.password.push(c),
            },
            KeyCode::Enter => {
                if self.login.field == LoginField::Email && self.login.password.is_empty() {
                    self.login.field = LoginField::Password;
                    return None;
                }
                if self.login.email.trim().is_empty() || self.login.password.is_empty() {
                    self.login.error = Some("Email and password are required".to_string());
                    return None;
                }
                self.login.submitting = true;
                self.login.error = None;
                return Some(Command::Login {
                    email: self.login.email.trim().to_string(),
                    password: self.login.password.clone(),
                });
            }
            _ => {}
        }
        None
    }

    fn normal_key(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Char('q') => return Some(Command::Quit),
            KeyCode::Char('r') => {
                self.add_log("INFO", "Refreshing");
                return Some(self.load_command());
            }
            KeyCode::Char('d') => return Some(self.switch_to(Screen::Dashboard)),
            KeyCode::Char('b') => return Some(self.switch_to(Screen::Bookings)),
            KeyCode::Char('L') => return Some(Command::Logout),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                return None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.rows().len() {
                    self.selected += 1;
                }
                return None;
            }
            _ => {}
        }

        match self.screen {
            Screen::Dashboard => match code {
                KeyCode::Enter => self.open_selected(),
                _ => None,
            },
            Screen::Bookings => self.bookings_key(code),
            Screen::Detail(id) => self.detail_key(id, code),
            Screen::Login => None,
        }
    }

    fn bookings_key(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('/') => {
                self.input_buffer = self.filters.search.clone().unwrap_or_default();
                self.input = InputMode::Search;
                None
            }
            KeyCode::Char('s') => {
                self.input = InputMode::PickStatus;
                None
            }
            KeyCode::Char('v') => {
                self.input = InputMode::PickService;
                None
            }
            KeyCode::Char('u') => {
                self.input = InputMode::PickUrgency;
                None
            }
            KeyCode::Char('f') => {
                self.input_buffer = self.filters.date_from.clone().unwrap_or_default();
                self.input = InputMode::DateFrom;
                None
            }
            KeyCode::Char('t') => {
                self.input_buffer = self.filters.date_to.clone().unwrap_or_default();
                self.input = InputMode::DateTo;
                None
            }
            KeyCode::Char('c') => {
                if !self.filters.is_filtered() && self.filters.page == 1 {
                    return None;
                }
                self.filters.clear();
                self.add_log("INFO", "Filters cleared");
                Some(self.reload_bookings())
            }
            KeyCode::Char('n') | KeyCode::Right => {
                if !self.can_go_next() {
                    return None;
                }
                self.filters.page += 1;
                Some(self.reload_bookings())
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if self.filters.page <= 1 {
                    return None;
                }
                self.filters.page -= 1;
                Some(self.reload_bookings())
            }
            _ => None,
        }
    }

    fn detail_key(&mut self, id: u64, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Esc | KeyCode::Backspace => Some(self.switch_to(self.home)),
            KeyCode::Char('g') => {
                self.notice = Some("Generating payment link...".to_string());
                Some(Command::GeneratePaymentLink(id))
            }
            KeyCode::Char('a') => {
                self.input_buffer.clear();
                self.input = InputMode::Note;
                None
            }
            KeyCode::Char('v') => {
                self.input_buffer = self
                    .payment_link
                    .as_ref()
                    .map(|l| l.reference.clone())
                    .unwrap_or_default();
                self.input = InputMode::PaymentReference;
                None
            }
            _ => None,
        }
    }

    fn input_key(&mut self, code: KeyCode) -> Option<Command> {
        if code == KeyCode::Esc {
            self.input = InputMode::Normal;
            self.input_buffer.clear();
            return None;
        }

        match self.input {
            InputMode::PickStatus | InputMode::PickService | InputMode::PickUrgency => {
                let KeyCode::Char(c) = code else {
                    return None;
                };
                let digit = c.to_digit(10)? as u16;
                let picked = self.input;
                self.input = InputMode::Normal;
                self.toggle_code(picked, digit)
            }
            InputMode::Search
            | InputMode::Note
            | InputMode::PaymentReference
            | InputMode::DateFrom
            | InputMode::DateTo => match code {
                KeyCode::Char(c) => {
                    self.input_buffer.push(c);
                    None
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                    None
                }
                KeyCode::Enter => self.submit_input(),
                _ => None,
            },
            InputMode::Normal => None,
        }
    }

    fn toggle_code(&mut self, picked: InputMode, digit: u16) -> Option<Command> {
        match picked {
            InputMode::PickStatus => {
                let code = if digit == 0 { 10 } else { digit };
                self.filters.toggle_status(code);
                let label = codes::status_badge(code).label;
                self.add_log("INFO", &format!("Status filter: {}", label));
            }
            InputMode::PickService if codes::service_type_info(digit).is_some() => {
                self.filters.toggle_service_type(digit);
                let label = codes::service_badge(digit).label;
                self.add_log("INFO", &format!("Service filter: {}", label));
            }
            InputMode::PickUrgency if codes::urgency_info(digit).is_some() => {
                self.filters.toggle_urgency(digit);
                let label = codes::urgency_badge(digit).label;
                self.add_log("INFO", &format!("Urgency filter: {}", label));
            }
            _ => {
                self.add_log("WARN", &format!("No such code: {}", digit));
                return None;
            }
        }
        Some(self.reload_bookings())
    }

    fn submit_input(&mut self) -> Option<Command> {
        let text = std::mem::take(&mut self.input_buffer);
        let mode = std::mem::replace(&mut self.input, InputMode::Normal);

        match (mode, self.screen) {
            (InputMode::Search, _) => {
                self.filters.set_search(text.trim());
                Some(self.reload_bookings())
            }
            (InputMode::DateFrom, _) => {
                let to = self.filters.date_to.take();
                self.filters.set_date_range(non_blank(&text), to);
                Some(self.reload_bookings())
            }
            (InputMode::DateTo, _) => {
                let from = self.filters.date_from.take();
                self.filters.set_date_range(from, non_blank(&text));
                Some(self.reload_bookings())
            }
            (InputMode::Note, Screen::Detail(id)) => {
                if text.trim().is_empty() {
                    self.notice = Some("Note cannot be empty".to_string());
                    return None;
                }
                self.notice = Some("Saving note...".to_string());
                Some(Command::AddNote { id, note: text })
            }
            (InputMode::PaymentReference, Screen::Detail(_)) => {
                if text.trim().is_empty() {
                    self.notice = Some("Payment reference is required".to_string());
                    return None;
                }
                self.notice = Some("Verifying payment...".to_string());
                Some(Command::VerifyPayment(text.trim().to_string()))
            }
            _ => None,
        }
    }

    fn reload_bookings(&mut self) -> Command {
        self.selected = 0;
        Command::LoadBookings
    }

    fn switch_to(&mut self, screen: Screen) -> Command {
        self.screen = screen;
        self.selected = 0;
        self.input = InputMode::Normal;
        if matches!(screen, Screen::Dashboard | Screen::Bookings) {
            self.home = screen;
        }
        self.load_command()
    }

    fn open_selected(&mut self) -> Option<Command> {
        let id = self.selected_booking()?.id;
        self.detail.reset();
        self.payment_link = None;
        self.verification = None;
        self.notice = None;
        self.screen = Screen::Detail(id);
        Some(Command::LoadDetail(id))
    }
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Record a non-auth failure for a section, falling back to the sample
/// snapshot when one is given.
fn degrade<T>(
    section: &mut Section<T>,
    log: &mut ActivityLog,
    what: &str,
    err: &ApiError,
    fallback: Option<T>,
) {
    let showing_sample = fallback.is_some();
    section.fail(err.user_message(), fallback);
    log.push(
        "ERROR",
        &format!(
            "{} unavailable: {}{}",
            what,
            err.user_message(),
            if showing_sample { " (showing sample data)" } else { "" }
        ),
    );
}
