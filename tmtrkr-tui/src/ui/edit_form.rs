use super::utils::{centered_rect, input_line};
use super::*;
use crate::app::EditField;

pub fn render_edit_form(frame: &mut Frame, app: &App) {
    let Some(active) = &app.active_record else {
        return;
    };

    let area = centered_rect(72, 16, frame.area());
    frame.render_widget(Clear, area);

    let title = match active.id {
        Some(id) => format!(" Edit record #{} ", id),
        None => " New record ".to_string(),
    };
    let focused = active.focused_field;

    let mut lines = vec![
        Line::from(""),
        input_line("Name", &active.name, focused == EditField::Name),
        input_line("Tags", &active.tags, focused == EditField::Tags),
        input_line("Start", &active.start_input, focused == EditField::Start),
        input_line("End", &active.end_input, focused == EditField::End),
        Line::from(""),
        Line::from(vec![
            Span::styled("Duration ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format::duration_fmt(active.duration, false),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(
                format!("  ({}h)", format::duration_hours_fmt(active.duration.unwrap_or(0))),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    if let Some(start) = active.start {
        lines.push(Line::from(Span::styled(
            format::ts_fmt(start, app.zone, app.locale),
            Style::default().fg(Color::DarkGray),
        )));
    }

    for message in [&active.input_error, &active.errors].into_iter().flatten() {
        lines.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    if focused.time_field().is_some() {
        lines.push(Line::from(""));
        lines.push(utils::key_hints(&[
            ("^N", "Now"),
            ("^T", "Today"),
            ("^O", "Noon"),
            ("^E", "Same"),
            ("^X", "Clear"),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(title, Style::default().fg(Color::Yellow)))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}
