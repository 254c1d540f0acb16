use super::{ActiveRecord, App, EditField, TimeAdjust, TimeField};
use crate::api::RecordInput;

impl App {
    /// Open the form on a blank record starting now.
    pub fn create_record(&mut self, now: i64) {
        self.active_record = Some(ActiveRecord::blank(self.zone, now));
        self.clear_status();
    }

    /// Open the form on a copy of the focused record.
    pub fn edit_record(&mut self, now: i64) {
        let Some(record) = self.focused_record() else {
            return;
        };
        let active = ActiveRecord::from_record(record, self.zone, now);
        self.active_record = Some(active);
        self.clear_status();
    }

    pub fn close_active_record(&mut self) {
        self.active_record = None;
    }

    /// Ask for confirmation before deleting the open record.
    pub fn delete_record(&mut self) {
        let Some(active) = &mut self.active_record else {
            return;
        };
        match active.id {
            Some(id) => active.delete_id = Some(id),
            None => active.errors = Some("Record is not saved yet".to_string()),
        }
    }

    pub fn cancel_delete(&mut self) {
        if let Some(active) = &mut self.active_record {
            active.delete_id = None;
        }
    }

    /// Id awaiting a confirmed delete.
    pub fn pending_delete_id(&self) -> Option<i64> {
        self.active_record.as_ref().and_then(|a| a.delete_id)
    }

    /// Id and body for a save, or `None` after recording why it cannot be
    /// saved. `as_new` clears the buffer's id so this and later saves create
    /// a record.
    pub fn prepare_save(&mut self, as_new: bool, now: i64) -> Option<(Option<i64>, RecordInput)> {
        let zone = self.zone;
        let active = self.active_record.as_mut()?;
        if as_new {
            active.id = None;
        }
        active.validate(zone, now);
        match active.to_input() {
            Ok(input) => {
                active.errors = None;
                Some((active.id, input))
            }
            Err(err) => {
                active.errors = Some(err);
                None
            }
        }
    }

    /// Keep the form open and show why the save or delete failed.
    pub fn active_record_failed(&mut self, message: String) {
        if let Some(active) = &mut self.active_record {
            active.delete_id = None;
            active.errors = Some(message);
        }
    }

    pub fn active_record_set_tm(&mut self, adjust: TimeAdjust, field: TimeField, now: i64) {
        let zone = self.zone;
        if let Some(active) = &mut self.active_record {
            active.set_tm(adjust, field, zone, now);
        }
    }

    /// Apply `adjust` to the focused time field; ignored on text fields.
    pub fn active_record_adjust_focused(&mut self, adjust: TimeAdjust, now: i64) {
        let field = self
            .active_record
            .as_ref()
            .and_then(|a| a.focused_field.time_field());
        if let Some(field) = field {
            self.active_record_set_tm(adjust, field, now);
        }
    }

    pub fn active_record_next_field(&mut self) {
        if let Some(active) = &mut self.active_record {
            active.focused_field = active.focused_field.next();
        }
    }

    pub fn active_record_prev_field(&mut self) {
        if let Some(active) = &mut self.active_record {
            active.focused_field = active.focused_field.prev();
        }
    }

    pub fn active_record_focus(&mut self, field: EditField) {
        if let Some(active) = &mut self.active_record {
            active.focused_field = field;
        }
    }

    pub fn active_record_input_char(&mut self, c: char, now: i64) {
        self.edit_focused_input(now, |input| input.insert(c));
    }

    pub fn active_record_backspace(&mut self, now: i64) {
        self.edit_focused_input(now, |input| input.backspace());
    }

    pub fn active_record_move_cursor(&mut self, left: bool) {
        if let Some(active) = &mut self.active_record {
            let input = active.focused_input();
            if left {
                input.move_left();
            } else {
                input.move_right();
            }
        }
    }

    pub fn active_record_cursor_home_end(&mut self, home: bool) {
        if let Some(active) = &mut self.active_record {
            let input = active.focused_input();
            if home {
                input.home();
            } else {
                input.end();
            }
        }
    }

    /// Mutate the focused input, then re-derive instants and duration.
    fn edit_focused_input(&mut self, now: i64, edit: impl FnOnce(&mut super::TextInput)) {
        let zone = self.zone;
        if let Some(active) = &mut self.active_record {
            edit(active.focused_input());
            active.validate(zone, now);
        }
    }
}
