use crate::app::{App, TimeAdjust, View};
use crate::format::unix_now;
use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use super::action_queue::{Action, ActionTx};

mod confirm_delete;
mod edit_record;
mod filter;
mod records;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * 60;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Step for arrow-key and scroll-wheel time adjustment.
fn time_step(modifiers: KeyModifiers) -> i64 {
    if modifiers.contains(KeyModifiers::SHIFT) {
        HOUR
    } else {
        MINUTE
    }
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match app.current_view() {
        View::Records => records::handle_records_key(key, app, action_tx),
        View::Filter => filter::handle_filter_key(key, app, action_tx),
        View::EditRecord => edit_record::handle_edit_record_key(key, app, action_tx),
        View::ConfirmDelete => confirm_delete::handle_confirm_delete_key(key, app, action_tx),
    }
}

/// Scroll wheel: moves the selection in the listing, adjusts the focused
/// time field in the edit form.
pub(super) fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    let up = match mouse.kind {
        MouseEventKind::ScrollUp => true,
        MouseEventKind::ScrollDown => false,
        _ => return,
    };
    match app.current_view() {
        View::Records => {
            if up {
                app.select_previous();
            } else {
                app.select_next();
            }
        }
        View::EditRecord => {
            let step = time_step(mouse.modifiers);
            let delta = if up { step } else { -step };
            app.active_record_adjust_focused(TimeAdjust::Offset(delta), unix_now());
        }
        View::Filter | View::ConfirmDelete => {}
    }
}
