use crate::app::{App, TimeAdjust};
use crate::format::unix_now;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::{enqueue_action, time_step, HOUR};

pub(super) fn handle_edit_record_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let now = unix_now();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => enqueue_action(action_tx, Action::SaveRecord),
            KeyCode::Char('a') => enqueue_action(action_tx, Action::SaveAsNewRecord),
            KeyCode::Char('d') => app.delete_record(),
            KeyCode::Char('n') => app.active_record_adjust_focused(TimeAdjust::Now, now),
            KeyCode::Char('t') => app.active_record_adjust_focused(TimeAdjust::Today, now),
            KeyCode::Char('o') => app.active_record_adjust_focused(TimeAdjust::Noon, now),
            KeyCode::Char('e') => app.active_record_adjust_focused(TimeAdjust::Same, now),
            KeyCode::Char('x') => app.active_record_adjust_focused(TimeAdjust::Clear, now),
            _ => {}
        }
        return;
    }

    let on_time_field = app
        .active_record
        .as_ref()
        .is_some_and(|a| a.focused_field.time_field().is_some());

    match key.code {
        KeyCode::Esc => app.close_active_record(),
        KeyCode::Enter => enqueue_action(action_tx, Action::SaveRecord),
        KeyCode::Tab => app.active_record_next_field(),
        KeyCode::BackTab => app.active_record_prev_field(),
        KeyCode::Up if on_time_field => {
            app.active_record_adjust_focused(TimeAdjust::Offset(time_step(key.modifiers)), now)
        }
        KeyCode::Down if on_time_field => {
            app.active_record_adjust_focused(TimeAdjust::Offset(-time_step(key.modifiers)), now)
        }
        KeyCode::PageUp => app.active_record_adjust_focused(TimeAdjust::Offset(HOUR), now),
        KeyCode::PageDown => app.active_record_adjust_focused(TimeAdjust::Offset(-HOUR), now),
        KeyCode::Up => app.active_record_prev_field(),
        KeyCode::Down => app.active_record_next_field(),
        KeyCode::Left => app.active_record_move_cursor(true),
        KeyCode::Right => app.active_record_move_cursor(false),
        KeyCode::Home => app.active_record_cursor_home_end(true),
        KeyCode::End => app.active_record_cursor_home_end(false),
        KeyCode::Backspace => app.active_record_backspace(now),
        KeyCode::Char(c) => app.active_record_input_char(c, now),
        _ => {}
    }
}
