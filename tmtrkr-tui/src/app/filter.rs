use super::{App, FilterEditState, FilterField, TextInput};
use crate::format;
use crate::types::Filter;

impl App {
    pub fn open_filter(&mut self) {
        self.filter_edit = Some(FilterEditState {
            start_a: TextInput::from_str(self.filter.start_a.as_deref().unwrap_or("")),
            start_b: TextInput::from_str(self.filter.start_b.as_deref().unwrap_or("")),
            q: TextInput::from_str(self.filter.q.as_deref().unwrap_or("")),
            focused_field: FilterField::StartA,
            error: None,
        });
    }

    pub fn cancel_filter(&mut self) {
        self.filter_edit = None;
    }

    /// Validate the dialog and make it the active filter. Returns true when
    /// the date bounds changed and the listing must be re-fetched.
    pub fn apply_filter(&mut self) -> bool {
        let Some(edit) = &mut self.filter_edit else {
            return false;
        };

        let start_a = edit.start_a.non_empty();
        let start_b = edit.start_b.non_empty();
        for date in [&start_a, &start_b].into_iter().flatten() {
            if format::parse_yymd(date).is_none() {
                edit.error = Some(format!("Invalid date {:?} (use YYYY-MM-DD)", date));
                return false;
            }
        }

        let filter = Filter {
            start_a,
            start_b,
            q: edit.q.non_empty(),
        };
        self.filter_edit = None;
        let refetch = self.set_filter(filter);
        self.clamp_focus();
        refetch
    }

    /// Drop every bound and the query. Returns true when the listing must be
    /// re-fetched.
    pub fn clear_filter(&mut self) -> bool {
        self.filter_edit = None;
        let refetch = self.set_filter(Filter::default());
        self.clamp_focus();
        self.set_status("Filter cleared".to_string());
        refetch
    }

    fn set_filter(&mut self, filter: Filter) -> bool {
        let refetch = filter.start_a != self.filter.start_a || filter.start_b != self.filter.start_b;
        self.filter = filter;
        refetch
    }

    /// Fill the date bounds with today in the active zone.
    pub fn filter_today(&mut self, now: i64) {
        let today = format::ts_yymd(now, self.zone);
        if let Some(edit) = &mut self.filter_edit {
            edit.start_a.set(&today);
            edit.start_b.set(&today);
            edit.error = None;
        }
    }

    pub fn filter_next_field(&mut self) {
        if let Some(edit) = &mut self.filter_edit {
            edit.focused_field = edit.focused_field.next();
        }
    }

    pub fn filter_prev_field(&mut self) {
        if let Some(edit) = &mut self.filter_edit {
            edit.focused_field = edit.focused_field.prev();
        }
    }

    pub fn filter_input_char(&mut self, c: char) {
        if let Some(edit) = &mut self.filter_edit {
            edit.focused_input().insert(c);
            edit.error = None;
        }
    }

    pub fn filter_backspace(&mut self) {
        if let Some(edit) = &mut self.filter_edit {
            edit.focused_input().backspace();
            edit.error = None;
        }
    }

    pub fn filter_move_cursor(&mut self, left: bool) {
        if let Some(edit) = &mut self.filter_edit {
            let input = edit.focused_input();
            if left {
                input.move_left();
            } else {
                input.move_right();
            }
        }
    }
}
