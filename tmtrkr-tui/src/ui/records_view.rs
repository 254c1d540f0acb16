use super::*;
use crate::types::Record;

enum Row<'a> {
    Day {
        label: String,
        total: String,
    },
    Record {
        index: usize,
        record: &'a Record,
    },
}

pub fn render_records_view(frame: &mut Frame, app: &mut App, area: Rect, now: i64) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(Span::styled(" Records ", Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buckets = app.records_by_day(now);
    if buckets.is_empty() {
        frame.render_widget(
            Paragraph::new("No records").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut rows: Vec<Row<'_>> = Vec::new();
    let mut index = 0;
    for bucket in &buckets {
        let week = bucket.week.map(|w| format!("  W{:02}", w)).unwrap_or_default();
        rows.push(Row::Day {
            label: format!("── {}{} ──", bucket.day, week),
            total: format::duration_fmt(Some(bucket.duration), true),
        });
        for &record in &bucket.records {
            rows.push(Row::Record { index, record });
            index += 1;
        }
    }

    let focused_row = app.focused_index.and_then(|fi| {
        rows.iter()
            .position(|r| matches!(r, Row::Record { index, .. } if *index == fi))
    });

    let max_rows = inner.height as usize;
    let total_rows = rows.len();
    let mut scroll = app.scroll;
    if let Some(focused) = focused_row {
        if focused >= scroll + max_rows {
            scroll = focused + 1 - max_rows;
        }
        // Keep the day header of the first record in view.
        if focused <= scroll {
            scroll = focused.saturating_sub(1);
        }
    }
    if total_rows <= max_rows {
        scroll = 0;
    } else if scroll > total_rows - max_rows {
        scroll = total_rows - max_rows;
    }

    let content_width = if total_rows > max_rows {
        inner.width.saturating_sub(1)
    } else {
        inner.width
    };

    for (offset, row) in rows.iter().skip(scroll).take(max_rows).enumerate() {
        let rect = Rect::new(inner.x, inner.y + offset as u16, content_width, 1);
        let line = match row {
            Row::Day { label, total } => Line::from(vec![
                Span::styled(label.clone(), Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(total.clone(), Style::default().fg(Color::Magenta)),
            ]),
            Row::Record { index, record } => {
                record_line(record, app.focused_index == Some(*index), app, now)
            }
        };
        frame.render_widget(Paragraph::new(line), rect);
    }

    if total_rows > max_rows {
        let mut scrollbar_state = ScrollbarState::new(total_rows)
            .position(scroll)
            .viewport_content_length(max_rows);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(Color::DarkGray)),
            inner,
            &mut scrollbar_state,
        );
    }

    app.scroll = scroll;
}

fn record_line<'a>(record: &'a Record, focused: bool, app: &App, now: i64) -> Line<'a> {
    let start = record
        .start
        .map(|start| format::ts_time_fmt(start, app.zone))
        .unwrap_or_else(|| "--:--".to_string());
    let end = record
        .end
        .map(|end| format::ts_time_fmt(end, app.zone))
        .unwrap_or_else(|| "…".to_string());
    let duration = format::duration_fmt(record.duration_at(now), false);

    let base = if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let time_color = if record.is_running() {
        Color::Green
    } else {
        Color::Yellow
    };

    let mut spans = vec![
        Span::styled(if focused { "▶ " } else { "  " }, base.fg(Color::Yellow)),
        Span::styled(format!("{} - {:<5}", start, end), base.fg(time_color)),
        Span::styled(format!(" {:>14} ", duration), base.fg(Color::Magenta)),
        Span::styled(record.name.as_str(), base.fg(Color::White)),
    ];
    if let Some(tags) = record.tags.as_deref().filter(|t| !t.is_empty()) {
        let tags: Vec<String> = tags.split_whitespace().map(|t| format!("#{}", t)).collect();
        spans.push(Span::styled(format!("  {}", tags.join(" ")), base.fg(Color::Cyan)));
    }
    Line::from(spans)
}
