use crate::app::{App, View};
use crate::format::{self, unix_now};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

mod delete_dialog;
mod edit_form;
mod filter_dialog;
mod records_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let now = unix_now();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Records
            Constraint::Length(1), // Status
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, root[0], app, now);
    records_view::render_records_view(frame, app, root[1], now);
    render_status(frame, root[2], app);
    render_controls(frame, root[3], app.current_view());

    match app.current_view() {
        View::Records => {}
        View::Filter => filter_dialog::render_filter_dialog(frame, app),
        View::EditRecord => edit_form::render_edit_form(frame, app),
        View::ConfirmDelete => {
            edit_form::render_edit_form(frame, app);
            delete_dialog::render_delete_confirm_dialog(frame, app);
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, now: i64) {
    let user = app.user.as_deref().unwrap_or("-");
    let mut title = vec![
        Span::styled(
            " tmtrkr ",
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(user.to_string(), Style::default().fg(Color::White)),
    ];
    if app.dev_mode {
        title.push(Span::styled("  [dev]", Style::default().fg(Color::Magenta)));
    }
    if app.is_loading {
        title.push(Span::styled("  loading…", Style::default().fg(Color::DarkGray)));
    }

    let visible = app.visible_records().len();
    let total = format::duration_fmt(Some(app.visible_duration(now)), true);
    let summary = Line::from(vec![
        Span::styled(filter_summary(app), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            format!("{} of {} records", visible, app.data.count),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(total, Style::default().fg(Color::Magenta)),
        Span::raw("  "),
        Span::styled(
            format!("{} · {}", app.zone.label(), app.locale.name()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(vec![Line::from(title), summary]), area);
}

fn filter_summary(app: &App) -> String {
    let filter = &app.filter;
    if filter.is_empty() {
        return "All records".to_string();
    }
    let mut parts = Vec::new();
    match (&filter.start_a, &filter.start_b) {
        (Some(a), Some(b)) if a == b => parts.push(a.clone()),
        (Some(a), Some(b)) => parts.push(format!("{} – {}", a, b)),
        (Some(a), None) => parts.push(format!("from {}", a)),
        (None, Some(b)) => parts.push(format!("until {}", b)),
        (None, None) => {}
    }
    if let Some(q) = &filter.q {
        parts.push(format!("\"{}\"", q));
    }
    parts.join(" ")
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(message) = &app.status_message {
        frame.render_widget(
            Paragraph::new(Span::styled(message.as_str(), Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center),
            area,
        );
    }
}

fn render_controls(frame: &mut Frame, area: Rect, view: View) {
    let hints: &[(&str, &str)] = match view {
        View::Records => &[
            ("↑↓", "Navigate"),
            ("Enter", "Edit"),
            ("n", "New"),
            ("d", "Delete"),
            ("f", "Filter"),
            ("c", "Clear filter"),
            ("r", "Refresh"),
            ("z", "Timezone"),
            ("l", "Locale"),
            ("q", "Quit"),
        ],
        View::Filter => &[
            ("Tab", "Next field"),
            ("Ctrl+T", "Today"),
            ("Ctrl+X", "Clear"),
            ("Enter", "Apply"),
            ("Esc", "Cancel"),
        ],
        View::EditRecord => &[
            ("Ctrl+S", "Save"),
            ("Ctrl+A", "Save as new"),
            ("Ctrl+D", "Delete"),
            ("↑↓/PgUp/PgDn", "Adjust time"),
            ("Esc", "Close"),
        ],
        View::ConfirmDelete => &[("y", "Delete"), ("n", "Keep")],
    };

    let controls = Paragraph::new(utils::key_hints(hints))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(" Controls ", Style::default().fg(Color::DarkGray)))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(controls, area);
}
