use super::utils::{centered_rect, input_line};
use super::*;
use crate::app::FilterField;

pub fn render_filter_dialog(frame: &mut Frame, app: &App) {
    let Some(edit) = &app.filter_edit else {
        return;
    };

    let area = centered_rect(56, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        input_line("From", &edit.start_a, edit.focused_field == FilterField::StartA),
        input_line("Until", &edit.start_b, edit.focused_field == FilterField::StartB),
        input_line("Search", &edit.q, edit.focused_field == FilterField::Query),
        Line::from(""),
    ];
    match &edit.error {
        Some(err) => lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            format!("Dates are YYYY-MM-DD in {}", app.zone.label()),
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(" Filter ", Style::default().fg(Color::Cyan)))
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(paragraph, area);
}
