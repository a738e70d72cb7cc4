// services/admin-dash/src/main.rs
//
// Terminal admin dashboard for GloHorizon bookings
//
// Run with: cargo run --bin admin-dash -- --demo

use std::fs::OpenOptions;
use std::io::stdout;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svckit::config::{AdminDashConfig, ObservabilityConfig};
use svckit::http::{FileCredentialStore, Session};
use svckit::{load_config, metrics, AdminApi, BookingFilters};

mod api;
mod mock;
mod state;
mod ui;

use api::{ApiEvent, Backend, Dispatcher};
use state::{AppState, Command, Screen};

#[derive(Parser, Debug)]
#[command(name = "admin-dash")]
#[command(about = "Terminal admin dashboard for GloHorizon travel bookings")]
#[command(version)]
struct Args {
    #[arg(short, long, default_value = "config/admin-dash.yaml")]
    config: String,

    /// Admin API base URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Run on the built-in sample data, no server required
    #[arg(long, short)]
    demo: bool,

    /// Open the bookings screen with these filters, e.g. "status=1,2&urgency=3"
    #[arg(long)]
    filters: Option<String>,

    /// Redraw interval in milliseconds
    #[arg(long, default_value = "250")]
    refresh_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;
    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }

    // stdout belongs to the terminal UI
    init_tracing(&config.observability)?;
    info!("Starting admin-dash (demo: {})", args.demo);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;

    let (backend, session) = if args.demo {
        (Backend::Demo, None)
    } else {
        let store = FileCredentialStore::new(&config.session.credentials_path);
        let session = Arc::new(Session::new(Arc::new(store)));
        let api = AdminApi::new(&config.api, session.clone())?;
        (Backend::Live(api), Some(session))
    };
    let (dispatcher, events) = Dispatcher::new(backend, runtime.handle().clone());

    let mut state = initial_state(&args, &config);
    let first = match &session {
        None => {
            state.add_log("INFO", "Started in DEMO mode on sample data");
            Some(state.enter(None))
        }
        Some(session) if session.is_authenticated() => {
            state.add_log("INFO", &format!("Resumed session against {}", config.api.base_url));
            Some(state.enter(session.user()))
        }
        Some(_) => {
            state.add_log("INFO", &format!("Sign in to {}", config.api.base_url));
            None
        }
    };
    if let Some(command) = first {
        dispatcher.execute(command, &mut state);
    }

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &dispatcher, events, &mut state, args.refresh_ms);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    runtime.shutdown_timeout(Duration::from_millis(200));
    info!("admin-dash stopped");
    result
}

fn init_tracing(observability: &ObservabilityConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&observability.log_file)
        .with_context(|| format!("opening log file {}", observability.log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("admin_dash={0},svckit={0}", observability.log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn initial_state(args: &Args, config: &AdminDashConfig) -> AppState {
    let filters = seed_filters(args.filters.as_deref(), config.dashboard.page_size);
    let api_url = if args.demo { "sample data" } else { config.api.base_url.as_str() };
    let mut state = AppState::new(api_url, filters, config.dashboard.recent_limit, args.demo);
    if args.filters.is_some() {
        state.home = Screen::Bookings;
    }
    state
}

/// Filters from a `--filters` query string; the configured page size applies
/// unless the query carries a valid one.
fn seed_filters(query: Option<&str>, page_size: u32) -> BookingFilters {
    match query {
        Some(query) => BookingFilters::decode_with_page_size(query, page_size),
        None => BookingFilters::with_page_size(page_size),
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    dispatcher: &Dispatcher,
    mut events: UnboundedReceiver<ApiEvent>,
    state: &mut AppState,
    refresh_ms: u64,
) -> Result<()> {
    let tick_rate = Duration::from_millis(refresh_ms.max(16));
    let mut last_tick = Instant::now();

    loop {
        // Apply finished API calls
        while let Ok(event) = events.try_recv() {
            if let Some(command) = state.apply(event) {
                dispatcher.execute(command, state);
            }
        }

        terminal.draw(|frame| ui::draw_ui(frame, state))?;

        // Handle input
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match state.handle_key(key) {
                        Some(Command::Quit) => return Ok(()),
                        Some(command) => dispatcher.execute(command, state),
                        None => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            state.request_totals = metrics::request_totals();
            last_tick = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_filters_from_query() {
        let filters = seed_filters(Some("status=1,2&urgency=3"), 25);
        assert_eq!(filters.status.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(filters.urgency.iter().copied().collect::<Vec<_>>(), vec![3]);
        assert_eq!(filters.page_size, 25);

        let filters = seed_filters(Some("pageSize=10&page=2"), 25);
        assert_eq!((filters.page, filters.page_size), (2, 10));

        let filters = seed_filters(Some("pageSize=abc&status=4"), 25);
        assert_eq!(filters.page_size, 25);
        assert!(filters.status.contains(&4));

        assert_eq!(seed_filters(None, 15), BookingFilters::with_page_size(15));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "admin-dash",
            "--demo",
            "--filters",
            "status=8",
            "--api-url",
            "http://api.test/api",
        ]);
        assert!(args.demo);
        assert_eq!(args.filters.as_deref(), Some("status=8"));
        assert_eq!(args.api_url.as_deref(), Some("http://api.test/api"));
        assert_eq!(args.config, "config/admin-dash.yaml");
        assert_eq!(args.refresh_ms, 250);

        let state = initial_state(&args, &AdminDashConfig::default());
        assert_eq!(state.home, Screen::Bookings);
        assert!(state.filters.status.contains(&8));
    }
}
