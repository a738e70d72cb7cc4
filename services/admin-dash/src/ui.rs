// services/admin-dash/src/ui.rs
//
// Rendering for every screen. Reads AppState, never mutates it.

use chrono::Utc;
use ratatui::{prelude::*, widgets::*};

use svckit::codes::{self, Badge, Tone};
use svckit::services::dashboard::service_breakdown;
use svckit::types::{format_money, BookingListItem};

use crate::state::{AppState, InputMode, LoginField, Screen, Section};

// Color palette: Navy, White, Silver, Gold
pub mod colors {
    use ratatui::style::Color;

    pub const NAVY: Color = Color::Rgb(16, 42, 87);
    pub const WHITE: Color = Color::Rgb(253, 246, 227);
    pub const SILVER: Color = Color::Rgb(147, 161, 161);
    pub const GOLD: Color = Color::Rgb(255, 193, 37);
    pub const DARK_GOLD: Color = Color::Rgb(184, 134, 11);
    pub const BG_DARK: Color = Color::Rgb(0, 20, 30);
    pub const BG_PANEL: Color = Color::Rgb(7, 30, 41);
    pub const SUCCESS: Color = Color::Rgb(133, 153, 0);
    pub const ERROR: Color = Color::Rgb(220, 50, 47);
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Gray => colors::SILVER,
        Tone::Yellow => colors::GOLD,
        Tone::Blue => Color::Rgb(38, 139, 210),
        Tone::Green => colors::SUCCESS,
        Tone::Orange => Color::Rgb(203, 75, 22),
        Tone::Indigo => Color::Rgb(108, 113, 196),
        Tone::Purple => Color::Rgb(211, 54, 130),
        Tone::Red => colors::ERROR,
    }
}

fn badge_span(badge: Badge) -> Span<'static> {
    let mut style = Style::default().fg(tone_color(badge.tone));
    if badge.alert {
        style = style.add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK);
    }
    if !badge.known {
        style = style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(format!("{} {}", badge.icon, badge.label), style)
}

fn panel(title: &str, sample: bool) -> Block<'static> {
    let mut spans = vec![Span::styled(
        format!(" {} ", title),
        Style::default().fg(colors::WHITE).bold(),
    )];
    if sample {
        spans.push(Span::styled(
            "[SAMPLE] ",
            Style::default().fg(colors::BG_DARK).bg(colors::GOLD).bold(),
        ));
    }
    Block::default()
        .title(Line::from(spans))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SILVER))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL))
}

pub fn draw_ui(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors::BG_DARK)),
        area,
    );

    if state.screen == Screen::Login {
        draw_login(frame, area, state);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Screen
            Constraint::Length(8), // Activity
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, chunks[0], state);
    match state.screen {
        Screen::Dashboard => draw_dashboard(frame, chunks[1], state),
        Screen::Bookings => draw_bookings(frame, chunks[1], state),
        Screen::Detail(id) => draw_detail(frame, chunks[1], state, id),
        Screen::Login => {}
    }
    draw_activity_panel(frame, chunks[2], state);
    draw_footer(frame, chunks[3], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let (mode_text, mode_color) = if state.demo {
        ("DEMO", colors::GOLD)
    } else if [state.stats.sample, state.recent.sample, state.bookings.sample]
        .iter()
        .any(|s| *s)
    {
        ("DEGRADED", colors::ERROR)
    } else {
        ("LIVE", colors::SUCCESS)
    };

    let screen = match state.screen {
        Screen::Dashboard => "DASHBOARD".to_string(),
        Screen::Bookings => "BOOKINGS".to_string(),
        Screen::Detail(id) => format!("BOOKING #{}", id),
        Screen::Login => "LOGIN".to_string(),
    };

    let user = state
        .user
        .as_ref()
        .map(|u| if u.full_name.is_empty() { u.email.clone() } else { u.full_name.clone() })
        .unwrap_or_default();

    let title = Line::from(vec![
        Span::styled(
            " GLOHORIZON ",
            Style::default().fg(colors::WHITE).bg(colors::NAVY).bold(),
        ),
        Span::raw("  "),
        Span::styled(screen, Style::default().fg(colors::GOLD).bold()),
        Span::raw("  "),
        Span::styled(format!("[{}]", mode_text), Style::default().fg(mode_color).bold()),
        Span::raw("  "),
        Span::styled(user, Style::default().fg(colors::SILVER)),
    ]);

    let header = Paragraph::new(title).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors::NAVY))
            .style(Style::default().bg(colors::BG_DARK)),
    );
    frame.render_widget(header, area);
}

fn draw_login(frame: &mut Frame, area: Rect, state: &AppState) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, form_area, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(56),
        Constraint::Fill(1),
    ])
    .areas(middle);

    let field = |label: &str, value: String, active: bool| {
        let style = if active {
            Style::default().fg(colors::GOLD).bold()
        } else {
            Style::default().fg(colors::SILVER)
        };
        Line::from(vec![
            Span::styled(format!("{:>9}: ", label), style),
            Span::styled(value, Style::default().fg(colors::WHITE)),
            Span::styled(if active { "_" } else { "" }, style),
        ])
    };

    let form = &state.login;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Admin sign-in to {}", state.api_url),
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        field("Email", form.email.clone(), form.field == LoginField::Email),
        field(
            "Password",
            "*".repeat(form.password.chars().count()),
            form.field == LoginField::Password,
        ),
        Line::from(""),
    ];
    if form.submitting {
        lines.push(Line::from(Span::styled("Signing in...", Style::default().fg(colors::GOLD))));
    } else if let Some(error) = &form.error {
        let style = Style::default().fg(colors::ERROR).bold();
        lines.push(Line::from(Span::styled(error.clone(), style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[TAB] switch field  [ENTER] sign in  [ESC] quit",
        Style::default().fg(colors::SILVER),
    )));

    let block = Block::default()
        .title(Span::styled(" GLOHORIZON ADMIN ", Style::default().fg(colors::GOLD).bold()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::DARK_GOLD))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));
    frame.render_widget(Paragraph::new(lines).block(block), form_area);
}

fn draw_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    draw_stats_panel(frame, chunks[0], state);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    let title = match state.recent.data.as_deref() {
        Some(items) if !items.is_empty() => format!("RECENT BOOKINGS  {}", service_mix(items)),
        _ => "RECENT BOOKINGS".to_string(),
    };
    let recent_block = panel(&title, state.recent.sample);
    draw_booking_table(frame, lists[0], &state.recent, state.rows(), state.selected, recent_block);
    draw_urgent_panel(frame, lists[1], state);
}

fn draw_stats_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = &state.stats;
    if section.data.is_none() {
        let message = section_message(section, "Loading stats...", "No stats");
        frame.render_widget(Paragraph::new(message).block(panel("OVERVIEW", false)), area);
        return;
    }

    let outer = panel("OVERVIEW", section.sample);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    if let Some(stats) = &section.data {
        let total = stats.total_bookings.to_string();
        draw_stat_box(frame, chunks[0], "TOTAL BOOKINGS", &total, colors::WHITE);
        draw_stat_box(
            frame,
            chunks[1],
            "PENDING REVIEW",
            &stats.pending_bookings.to_string(),
            if stats.pending_bookings > 0 { colors::GOLD } else { colors::SILVER },
        );
        let completed = stats.completed_bookings.to_string();
        draw_stat_box(frame, chunks[2], "COMPLETED", &completed, colors::SUCCESS);
        let customers = stats.customer_count().to_string();
        draw_stat_box(frame, chunks[3], "TOTAL CUSTOMERS", &customers, colors::WHITE);
    }

    if let Some(error) = &section.error {
        let line = Span::styled(format!("Stats: {}", error), Style::default().fg(colors::ERROR));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), rows[1]);
    }
}

fn draw_stat_box(frame: &mut Frame, area: Rect, label: &str, value: &str, value_color: Color) {
    let text = vec![
        Line::from(Span::styled(
            label,
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(value, Style::default().fg(value_color).bold())),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

/// `Flight 2 · Hotel 1` for the given bookings.
fn service_mix(items: &[BookingListItem]) -> String {
    service_breakdown(items)
        .into_iter()
        .map(|(code, count)| format!("{} {}", codes::service_badge(code).label, count))
        .collect::<Vec<_>>()
        .join(" · ")
}

fn draw_urgent_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let section = &state.urgent;
    let block = panel(&format!("NEEDS ATTENTION ({})", state.attention_count()), section.sample);

    let items = match &section.data {
        Some(items) if !items.is_empty() => items,
        _ => {
            let message = section_message(section, "Loading...", "Nothing urgent");
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        }
    };

    let now = Utc::now();
    let mut lines: Vec<Line> = items
        .iter()
        .map(|b| {
            Line::from(vec![
                badge_span(codes::urgency_badge(b.urgency)),
                Span::raw(" "),
                Span::styled(b.reference_number.clone(), Style::default().fg(colors::WHITE)),
                Span::styled(
                    format!("  {}", b.age_label(now)),
                    Style::default().fg(colors::SILVER),
                ),
            ])
        })
        .collect();
    if let Some(error) = &section.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(colors::ERROR))));
    }

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_bookings(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    draw_filter_bar(frame, chunks[0], state);

    let block = panel("BOOKINGS", state.bookings.sample);
    draw_booking_table(frame, chunks[1], &state.bookings, state.rows(), state.selected, block);

    let mut spans = Vec::new();
    if let Some(window) = state.bookings_window() {
        spans.push(Span::styled(window.summary(), Style::default().fg(colors::SILVER)));
        if state.bookings.data.as_ref().is_some_and(|p| p.is_total_estimated()) {
            let style = Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM);
            spans.push(Span::styled(" (total estimated)", style));
        }
        if window.shows_controls() {
            let prev = if window.has_previous() { colors::GOLD } else { colors::SILVER };
            let next = if state.can_go_next() { colors::GOLD } else { colors::SILVER };
            spans.push(Span::raw("   "));
            spans.push(Span::styled("[P] prev", Style::default().fg(prev)));
            spans.push(Span::raw("  "));
            spans.push(Span::styled("[N] next", Style::default().fg(next)));
        }
    }
    if let Some(error) = &state.bookings.error {
        spans.push(Span::styled(format!("   {}", error), Style::default().fg(colors::ERROR)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), chunks[2]);
}

fn draw_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let filters = &state.filters;
    let join = |codes: &std::collections::BTreeSet<u16>, badge: fn(u16) -> Badge| {
        if codes.is_empty() {
            "any".to_string()
        } else {
            codes.iter().map(|c| badge(*c).label).collect::<Vec<_>>().join(", ")
        }
    };

    let label = |text: &'static str| Span::styled(text, Style::default().fg(colors::SILVER));
    let value = |text: String| Span::styled(text, Style::default().fg(colors::WHITE));
    let or_dash = |text: &Option<String>| text.clone().unwrap_or_else(|| "-".to_string());

    let prompt = match state.input {
        InputMode::Search => Some(format!("Search: {}_", state.input_buffer)),
        InputMode::DateFrom => Some(format!("Date from (YYYY-MM-DD): {}_", state.input_buffer)),
        InputMode::DateTo => Some(format!("Date to (YYYY-MM-DD): {}_", state.input_buffer)),
        InputMode::PickStatus => Some("Status code 1-9, 0 for 10:".to_string()),
        InputMode::PickService => Some("Service code 1-5:".to_string()),
        InputMode::PickUrgency => Some("Urgency code 1-3:".to_string()),
        _ => None,
    };

    let line = match prompt {
        Some(prompt) => Line::from(Span::styled(prompt, Style::default().fg(colors::GOLD).bold())),
        None => Line::from(vec![
            label("Search: "),
            value(or_dash(&filters.search)),
            label("  Status: "),
            value(join(&filters.status, codes::status_badge)),
            label("  Service: "),
            value(join(&filters.service_type, codes::service_badge)),
            label("  Urgency: "),
            value(join(&filters.urgency, codes::urgency_badge)),
            label("  From: "),
            value(or_dash(&filters.date_from)),
            label("  To: "),
            value(or_dash(&filters.date_to)),
        ]),
    };

    frame.render_widget(Paragraph::new(line).block(panel("FILTERS", false)), area);
}

fn draw_booking_table<T>(
    frame: &mut Frame,
    area: Rect,
    section: &Section<T>,
    rows: &[BookingListItem],
    selected: usize,
    block: Block,
) {
    if rows.is_empty() {
        let message = section_message(section, "Loading bookings...", "No bookings found");
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let now = Utc::now();
    let text = |s: String, color: Color| Cell::from(Span::styled(s, Style::default().fg(color)));
    let table_rows: Vec<Row> = rows
        .iter()
        .map(|b| {
            let mut row = Row::new(vec![
                text(b.reference_number.clone(), colors::WHITE),
                text(b.customer_name().to_string(), colors::WHITE),
                Cell::from(badge_span(codes::service_badge(b.service_type))),
                Cell::from(badge_span(codes::status_badge(b.status))),
                Cell::from(badge_span(codes::urgency_badge(b.urgency))),
                text(b.price_label(), colors::SILVER),
                text(b.age_label(now), colors::SILVER),
            ]);
            if b.needs_attention() {
                row = row.style(Style::default().add_modifier(Modifier::BOLD));
            }
            row
        })
        .collect();

    let header = Row::new(
        ["REFERENCE", "CUSTOMER", "SERVICE", "STATUS", "URGENCY", "PRICE", "CREATED"]
            .into_iter()
            .map(|h| Cell::from(Span::styled(h, Style::default().fg(colors::GOLD).bold()))),
    )
    .bottom_margin(1);

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(25),
            Constraint::Min(16),
            Constraint::Length(18),
            Constraint::Length(20),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(colors::NAVY));

    let mut table_state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, area, &mut table_state);

    if let Some(error) = &section.error {
        let line_area = Rect {
            y: area.bottom().saturating_sub(2),
            height: 1,
            ..area.inner(Margin::new(1, 0))
        };
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), Style::default().fg(colors::ERROR))),
            line_area,
        );
    }
}

fn draw_detail(frame: &mut Frame, area: Rect, state: &AppState, id: u64) {
    let section = &state.detail;
    let Some(detail) = &section.data else {
        let loading = format!("Loading booking #{}...", id);
        let message = section_message(section, &loading, "Booking not found");
        frame.render_widget(Paragraph::new(message).block(panel("BOOKING", false)), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let b = &detail.summary;
    let label =
        |text: &str| Span::styled(format!("{:<12}", text), Style::default().fg(colors::SILVER));
    let value = |text: String| Span::styled(text, Style::default().fg(colors::WHITE));

    let mut lines = vec![
        Line::from(vec![label("Reference"), value(b.reference_number.clone())]),
        Line::from(vec![label("Customer"), value(b.customer_name().to_string())]),
        Line::from(vec![
            label("Email"),
            value(b.user.as_ref().map(|u| u.email.clone()).unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![label("Service"), badge_span(codes::service_badge(b.service_type))]),
        Line::from(vec![label("Status"), badge_span(codes::status_badge(b.status))]),
        Line::from(vec![label("Urgency"), badge_span(codes::urgency_badge(b.urgency))]),
        Line::from(vec![label("Price"), value(b.price_label())]),
        Line::from(vec![
            label("Created"),
            value(b.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
        Line::from(""),
    ];
    for (key, text) in detail.travel_rows() {
        lines.push(Line::from(vec![label(&key), value(text)]));
    }
    if let Some(requests) = &detail.special_requests {
        lines.push(Line::from(vec![label("Requests"), value(requests.clone())]));
    }
    if let Some(notes) = &detail.admin_notes {
        lines.push(Line::from(vec![label("Notes"), value(notes.clone())]));
    }
    if let Some(error) = &section.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(colors::ERROR))));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel(&format!("BOOKING #{}", b.id), section.sample))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(6)])
        .split(chunks[1]);

    let history: Vec<Line> = detail
        .status_history
        .iter()
        .rev()
        .map(|change| {
            let mut spans = vec![
                Span::styled(
                    format!("{} ", change.changed_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
                ),
                badge_span(codes::status_badge(change.status)),
            ];
            if let Some(notes) = &change.notes {
                let style = Style::default().fg(colors::WHITE);
                spans.push(Span::styled(format!("  {}", notes), style));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(history).block(panel("STATUS HISTORY", false)).wrap(Wrap { trim: true }),
        right[0],
    );

    let mut actions = Vec::new();
    if let Some(link) = &state.payment_link {
        actions.push(Line::from(vec![
            Span::styled("Link: ", Style::default().fg(colors::SILVER)),
            Span::styled(link.payment_url.clone(), Style::default().fg(colors::GOLD)),
            Span::styled(
                format!("  {}", format_money(link.amount, &link.currency)),
                Style::default().fg(colors::WHITE),
            ),
        ]));
    }
    let prompt = match state.input {
        InputMode::Note => Some(format!("Note: {}_", state.input_buffer)),
        InputMode::PaymentReference => Some(format!("Payment reference: {}_", state.input_buffer)),
        _ => None,
    };
    if let Some(prompt) = prompt {
        actions.push(Line::from(Span::styled(prompt, Style::default().fg(colors::GOLD).bold())));
    } else if let Some(notice) = &state.notice {
        let color = if notice.contains("failed") { colors::ERROR } else { colors::SUCCESS };
        actions.push(Line::from(Span::styled(notice.clone(), Style::default().fg(color))));
    }
    frame.render_widget(
        Paragraph::new(actions).block(panel("ACTIONS", false)).wrap(Wrap { trim: true }),
        right[1],
    );
}

fn section_message<T>(section: &Section<T>, loading: &str, empty: &str) -> Line<'static> {
    if section.loading {
        Line::from(Span::styled(loading.to_string(), Style::default().fg(colors::GOLD)))
    } else if let Some(error) = &section.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(colors::ERROR)))
    } else {
        Line::from(Span::styled(empty.to_string(), Style::default().fg(colors::SILVER)))
    }
}

fn draw_activity_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let logs: Vec<Line> = state
        .activity_log
        .recent()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let (prefix, color) = match entry.level.as_str() {
                "ERROR" => ("[ERR]", colors::ERROR),
                "WARN" => ("[WRN]", colors::GOLD),
                "INFO" => ("[INF]", colors::SUCCESS),
                _ => ("[---]", colors::SILVER),
            };

            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::styled(entry.message.clone(), Style::default().fg(colors::WHITE)),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(logs).block(panel("ACTIVITY LOG", false)).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let key = |k: &str, bg: Color| {
        Span::styled(format!(" [{}] ", k), Style::default().fg(colors::BG_DARK).bg(bg))
    };
    let text = |t: &str| Span::styled(format!(" {} ", t), Style::default().fg(colors::SILVER));

    let mut spans = vec![
        key("Q", colors::ERROR),
        text("Quit"),
        key("R", colors::WHITE),
        text("Refresh"),
    ];
    match state.screen {
        Screen::Dashboard => {
            spans.extend([
                key("B", colors::GOLD),
                text("Bookings"),
                key("ENTER", colors::SILVER),
                text("Open"),
            ]);
        }
        Screen::Bookings => {
            spans.extend([
                key("/", colors::GOLD),
                text("Search"),
                key("S/V/U", colors::GOLD),
                text("Status/Service/Urgency"),
                key("F/T", colors::GOLD),
                text("Dates"),
                key("C", colors::SILVER),
                text("Clear"),
                key("D", colors::SILVER),
                text("Dashboard"),
            ]);
        }
        Screen::Detail(_) => {
            spans.extend([
                key("G", colors::GOLD),
                text("Pay link"),
                key("A", colors::GOLD),
                text("Note"),
                key("V", colors::GOLD),
                text("Verify"),
                key("ESC", colors::SILVER),
                text("Back"),
            ]);
        }
        Screen::Login => {}
    }

    let (ok, failed) = state.request_totals;
    spans.push(Span::styled(
        format!("  api ok:{} err:{}", ok, failed),
        Style::default().fg(if failed > 0 { colors::GOLD } else { colors::SILVER }),
    ));

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(colors::NAVY))
            .style(Style::default().bg(colors::BG_DARK)),
    );
    frame.render_widget(footer, area);
}
