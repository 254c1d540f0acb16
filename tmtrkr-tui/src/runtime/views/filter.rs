use crate::app::App;
use crate::format::unix_now;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_filter_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Enter => {
            if app.apply_filter() {
                enqueue_action(action_tx, Action::RefreshRecords);
            }
        }
        KeyCode::Char('t') if ctrl => app.filter_today(unix_now()),
        KeyCode::Char('x') if ctrl => {
            if app.clear_filter() {
                enqueue_action(action_tx, Action::RefreshRecords);
            }
        }
        KeyCode::Tab | KeyCode::Down => app.filter_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.filter_prev_field(),
        KeyCode::Left => app.filter_move_cursor(true),
        KeyCode::Right => app.filter_move_cursor(false),
        KeyCode::Backspace => app.filter_backspace(),
        KeyCode::Char(c) if !ctrl => app.filter_input_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::test_app;
    use crate::app::View;

    use super::super::super::action_queue::channel;

    #[test]
    fn typing_and_enter_applies_date_filter() {
        let (tx, mut rx) = channel();
        let mut app = test_app(Vec::new());
        app.open_filter();
        for c in "2024-02-29".chars() {
            handle_filter_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), &mut app, &tx);
        }
        handle_filter_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut app, &tx);

        assert_eq!(app.current_view(), View::Records);
        assert_eq!(app.filter.start_a.as_deref(), Some("2024-02-29"));
        assert_eq!(rx.try_recv().ok(), Some(Action::RefreshRecords));
    }

    #[test]
    fn escape_discards_changes() {
        let (tx, mut rx) = channel();
        let mut app = test_app(Vec::new());
        app.open_filter();
        handle_filter_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE), &mut app, &tx);
        handle_filter_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &mut app, &tx);
        assert_eq!(app.current_view(), View::Records);
        assert!(app.filter.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
