use crate::app::App;
use crate::format::unix_now;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_records_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Enter | KeyCode::Char('e') => app.edit_record(unix_now()),
        KeyCode::Char('n') => app.create_record(unix_now()),
        // Delete goes through the form so the record is visible while confirming
        KeyCode::Char('d') => {
            app.edit_record(unix_now());
            app.delete_record();
        }
        KeyCode::Char('r') => enqueue_action(action_tx, Action::RefreshRecords),
        KeyCode::Char('f') | KeyCode::Char('/') => app.open_filter(),
        KeyCode::Char('c') => {
            if app.clear_filter() {
                enqueue_action(action_tx, Action::RefreshRecords);
            }
        }
        KeyCode::Char('z') => {
            if app.toggle_timezone(unix_now()) {
                enqueue_action(action_tx, Action::RefreshRecords);
            }
        }
        KeyCode::Char('l') => app.toggle_locale(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{record, test_app};
    use crate::app::View;

    use super::super::super::action_queue::channel;

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_records_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn d_opens_delete_confirmation_for_focused_record() {
        let mut app = test_app(vec![record(2, "b", 200, None), record(1, "a", 100, None)]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.current_view(), View::ConfirmDelete);
        assert_eq!(app.pending_delete_id(), Some(1));
    }

    #[test]
    fn n_opens_blank_form() {
        let mut app = test_app(Vec::new());
        assert_eq!(press(&mut app, KeyCode::Char('n')), None);
        assert_eq!(app.current_view(), View::EditRecord);
        assert_eq!(app.active_record.as_ref().unwrap().id, None);
    }

    #[test]
    fn clearing_date_filter_refetches() {
        let mut app = test_app(Vec::new());
        app.filter.start_b = Some("2024-01-31".to_string());
        assert_eq!(press(&mut app, KeyCode::Char('c')), Some(Action::RefreshRecords));
        assert_eq!(press(&mut app, KeyCode::Char('c')), None);
    }

    #[test]
    fn q_quits() {
        let mut app = test_app(Vec::new());
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
