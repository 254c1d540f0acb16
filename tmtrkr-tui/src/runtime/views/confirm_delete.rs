use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_confirm_delete_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            enqueue_action(action_tx, Action::DeleteConfirmedRecord);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{record, test_app};
    use crate::app::View;
    use crossterm::event::KeyModifiers;

    use super::super::super::action_queue::channel;

    fn confirming_app() -> App {
        let mut app = test_app(vec![record(7, "x", 0, Some(60))]);
        app.edit_record(100);
        app.delete_record();
        app
    }

    #[test]
    fn y_queues_the_delete() {
        let (tx, mut rx) = channel();
        let mut app = confirming_app();
        handle_confirm_delete_key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE), &mut app, &tx);
        assert_eq!(rx.try_recv().ok(), Some(Action::DeleteConfirmedRecord));
    }

    #[test]
    fn n_returns_to_the_form() {
        let (tx, mut rx) = channel();
        let mut app = confirming_app();
        handle_confirm_delete_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE), &mut app, &tx);
        assert_eq!(app.current_view(), View::EditRecord);
        assert!(rx.try_recv().is_err());
    }
}
