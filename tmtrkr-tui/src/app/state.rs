use time::{OffsetDateTime, Time};

use crate::api::RecordInput;
use crate::format::{self, Zone};
use crate::types::{derive_duration, Record};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Records,
    Filter,
    EditRecord,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditField {
    Name,
    Tags,
    Start,
    End,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Tags,
            EditField::Tags => EditField::Start,
            EditField::Start => EditField::End,
            EditField::End => EditField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            EditField::Name => EditField::End,
            EditField::Tags => EditField::Name,
            EditField::Start => EditField::Tags,
            EditField::End => EditField::Start,
        }
    }

    pub fn time_field(self) -> Option<TimeField> {
        match self {
            EditField::Start => Some(TimeField::Start),
            EditField::End => Some(TimeField::End),
            EditField::Name | EditField::Tags => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeField {
    Start,
    End,
}

/// Relative adjustments of the start or end instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeAdjust {
    /// Current time, seconds zeroed.
    Now,
    /// Keep the time of day, move the date to today.
    Today,
    /// Same date at 12:00:00.
    Noon,
    /// Copy the other field.
    Same,
    Clear,
    /// Shift by a signed number of seconds.
    Offset(i64),
}

/// A text input with mid-string cursor support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    /// Replace the whole value, cursor at the end.
    pub fn set(&mut self, s: &str) {
        *self = Self::from_str(s);
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }
    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    /// Trimmed value, `None` when blank.
    pub fn non_empty(&self) -> Option<String> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        let mut p = pos;
        loop {
            p -= 1;
            if self.value.is_char_boundary(p) {
                return p;
            }
        }
    }
    fn next_boundary(&self, pos: usize) -> usize {
        let mut p = pos + 1;
        while p <= self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterField {
    StartA,
    StartB,
    Query,
}

impl FilterField {
    pub fn next(self) -> Self {
        match self {
            FilterField::StartA => FilterField::StartB,
            FilterField::StartB => FilterField::Query,
            FilterField::Query => FilterField::StartA,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FilterField::StartA => FilterField::Query,
            FilterField::StartB => FilterField::StartA,
            FilterField::Query => FilterField::StartB,
        }
    }
}

/// The filter dialog's inputs while it is open.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEditState {
    pub start_a: TextInput,
    pub start_b: TextInput,
    pub q: TextInput,
    pub focused_field: FilterField,
    pub error: Option<String>,
}

impl FilterEditState {
    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            FilterField::StartA => &mut self.start_a,
            FilterField::StartB => &mut self.start_b,
            FilterField::Query => &mut self.q,
        }
    }
}

/// Working copy of a record while the edit form is open.
///
/// `start` and `end` are derived from the input strings by [`ActiveRecord::validate`];
/// the inputs are what the user sees and types.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRecord {
    pub id: Option<i64>,
    pub name: TextInput,
    pub tags: TextInput,
    pub start_input: TextInput,
    pub end_input: TextInput,
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub duration: Option<i64>,
    /// Last save or delete failure.
    pub errors: Option<String>,
    /// Unparsable start or end input.
    pub input_error: Option<String>,
    /// Set while a delete waits for confirmation.
    pub delete_id: Option<i64>,
    pub focused_field: EditField,
}

fn zero_seconds(ts: i64) -> i64 {
    ts - ts.rem_euclid(60)
}

impl ActiveRecord {
    pub fn from_record(record: &Record, zone: Zone, now: i64) -> Self {
        let mut active = Self {
            id: Some(record.id),
            name: TextInput::from_str(&record.name),
            tags: TextInput::from_str(record.tags.as_deref().unwrap_or("")),
            start_input: TextInput::new(),
            end_input: TextInput::new(),
            start: record.start,
            end: record.end,
            duration: None,
            errors: None,
            input_error: None,
            delete_id: None,
            focused_field: EditField::Name,
        };
        active.refresh_inputs(zone, now);
        active
    }

    /// A new record starting now.
    pub fn blank(zone: Zone, now: i64) -> Self {
        let mut active = Self {
            id: None,
            name: TextInput::new(),
            tags: TextInput::new(),
            start_input: TextInput::new(),
            end_input: TextInput::new(),
            start: Some(zero_seconds(now)),
            end: None,
            duration: None,
            errors: None,
            input_error: None,
            delete_id: None,
            focused_field: EditField::Name,
        };
        active.refresh_inputs(zone, now);
        active
    }

    /// Re-render the input strings from the instants, e.g. after a zone change.
    pub fn refresh_inputs(&mut self, zone: Zone, now: i64) {
        let render = |ts: Option<i64>| ts.map(|ts| format::ts_yymdhms(ts, zone)).unwrap_or_default();
        self.start_input.set(&render(self.start));
        self.end_input.set(&render(self.end));
        self.validate(zone, now);
    }

    /// Recompute `start`, `end` and `duration` from the input strings.
    pub fn validate(&mut self, zone: Zone, now: i64) {
        let mut problems = Vec::new();
        self.start = parse_input(&self.start_input, zone, "start", &mut problems);
        self.end = parse_input(&self.end_input, zone, "end", &mut problems);
        self.input_error = (!problems.is_empty()).then(|| problems.join("; "));
        self.duration = self
            .start
            .and_then(|start| derive_duration(start, self.end, now));
    }

    pub fn time(&self, field: TimeField) -> Option<i64> {
        match field {
            TimeField::Start => self.start,
            TimeField::End => self.end,
        }
    }

    pub fn set_tm(&mut self, adjust: TimeAdjust, field: TimeField, zone: Zone, now: i64) {
        let current = self.time(field);
        let other = match field {
            TimeField::Start => self.end,
            TimeField::End => self.start,
        };
        let base = current.unwrap_or(now);

        let value = match adjust {
            TimeAdjust::Now => Some(zero_seconds(now)),
            TimeAdjust::Today => {
                let today = local(now, zone).map(|dt| dt.date());
                local(base, zone).zip(today).and_then(|(dt, today)| {
                    let time = Time::from_hms(dt.hour(), dt.minute(), 0).ok()?;
                    Some(instant(today.with_time(time), zone))
                })
            }
            TimeAdjust::Noon => local(base, zone).map(|dt| instant(dt.date().with_time(NOON), zone)),
            TimeAdjust::Same => other,
            TimeAdjust::Clear => None,
            TimeAdjust::Offset(secs) => Some(base + secs),
        };

        let rendered = value.map(|ts| format::ts_yymdhms(ts, zone)).unwrap_or_default();
        match field {
            TimeField::Start => self.start_input.set(&rendered),
            TimeField::End => self.end_input.set(&rendered),
        }
        self.validate(zone, now);
    }

    /// Request body for saving, or why the form cannot be saved yet.
    pub fn to_input(&self) -> Result<RecordInput, String> {
        if let Some(err) = &self.input_error {
            return Err(err.clone());
        }
        let start = self.start.ok_or_else(|| "Start time is required".to_string())?;
        Ok(RecordInput {
            start,
            end: self.end,
            name: self.name.value.trim().to_string(),
            tags: self.tags.value.trim().to_string(),
        })
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            EditField::Name => &mut self.name,
            EditField::Tags => &mut self.tags,
            EditField::Start => &mut self.start_input,
            EditField::End => &mut self.end_input,
        }
    }
}

const NOON: Time = time::macros::time!(12:00);

fn local(ts: i64, zone: Zone) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .map(|dt| dt.to_offset(zone.offset()))
}

fn instant(dt: time::PrimitiveDateTime, zone: Zone) -> i64 {
    dt.assume_offset(zone.offset()).unix_timestamp()
}

fn parse_input(input: &TextInput, zone: Zone, label: &str, problems: &mut Vec<String>) -> Option<i64> {
    let raw = input.value.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = format::parse_yymdhms(raw, zone);
    if parsed.is_none() {
        problems.push(format!("Invalid {} time {:?} (use YYYY-MM-DDTHH:MM:SS)", label, raw));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    const PLUS2: Zone = Zone::Local(offset!(+2));

    fn record() -> Record {
        Record {
            id: 4,
            name: "standup".to_string(),
            tags: Some("meeting team".to_string()),
            start: Some(datetime!(2024-03-01 09:00:00 UTC).unix_timestamp()),
            end: Some(datetime!(2024-03-01 09:15:30 UTC).unix_timestamp()),
            duration: Some(930.0),
            is_deleted: None,
            user_id: Some(1),
        }
    }

    fn now() -> i64 {
        datetime!(2024-03-05 16:47:23 UTC).unix_timestamp()
    }

    #[test]
    fn editing_copies_the_record_into_local_inputs() {
        let active = ActiveRecord::from_record(&record(), PLUS2, now());
        assert_eq!(active.id, Some(4));
        assert_eq!(active.start_input.value, "2024-03-01T11:00:00");
        assert_eq!(active.end_input.value, "2024-03-01T11:15:30");
        assert_eq!(active.duration, Some(930));
        assert_eq!(active.tags.value, "meeting team");
    }

    #[test]
    fn record_without_start_opens_with_empty_start() {
        let mut legacy = record();
        legacy.start = None;
        let active = ActiveRecord::from_record(&legacy, Zone::Utc, now());
        assert_eq!(active.start_input.value, "");
        assert_eq!(active.start, None);
        assert_eq!(active.duration, None);
        assert_eq!(active.to_input().unwrap_err(), "Start time is required");
    }

    #[test]
    fn blank_record_starts_now_without_seconds() {
        let active = ActiveRecord::blank(Zone::Utc, now());
        assert_eq!(active.id, None);
        assert_eq!(active.start_input.value, "2024-03-05T16:47:00");
        assert_eq!(active.end, None);
        assert_eq!(active.duration, Some(23));
    }

    #[test]
    fn unparsable_input_sets_error_and_clears_instant() {
        let mut active = ActiveRecord::from_record(&record(), Zone::Utc, now());
        active.end_input.set("tomorrow");
        active.validate(Zone::Utc, now());
        assert_eq!(active.end, None);
        assert!(active.input_error.as_deref().unwrap().contains("end"));
        assert!(active.to_input().is_err());

        active.end_input.set("");
        active.validate(Zone::Utc, now());
        assert_eq!(active.input_error, None);
    }

    #[test]
    fn set_tm_now_and_clear() {
        let mut active = ActiveRecord::from_record(&record(), Zone::Utc, now());
        active.set_tm(TimeAdjust::Now, TimeField::End, Zone::Utc, now());
        assert_eq!(active.end_input.value, "2024-03-05T16:47:00");
        active.set_tm(TimeAdjust::Clear, TimeField::End, Zone::Utc, now());
        assert_eq!(active.end, None);
        assert_eq!(active.end_input.value, "");
    }

    #[test]
    fn set_tm_today_keeps_time_of_day() {
        let mut active = ActiveRecord::from_record(&record(), PLUS2, now());
        active.set_tm(TimeAdjust::Today, TimeField::Start, PLUS2, now());
        assert_eq!(active.start_input.value, "2024-03-05T11:00:00");
    }

    #[test]
    fn set_tm_noon_keeps_the_date() {
        let mut active = ActiveRecord::from_record(&record(), PLUS2, now());
        active.set_tm(TimeAdjust::Noon, TimeField::End, PLUS2, now());
        assert_eq!(active.end_input.value, "2024-03-01T12:00:00");
        assert_eq!(active.duration, Some(3600));
    }

    #[test]
    fn set_tm_same_copies_the_other_field() {
        let mut active = ActiveRecord::from_record(&record(), Zone::Utc, now());
        active.set_tm(TimeAdjust::Same, TimeField::End, Zone::Utc, now());
        assert_eq!(active.end, active.start);
        assert_eq!(active.duration, Some(0));
    }

    #[test]
    fn set_tm_offset_treats_empty_as_now() {
        let mut active = ActiveRecord::from_record(&record(), Zone::Utc, now());
        active.set_tm(TimeAdjust::Clear, TimeField::End, Zone::Utc, now());
        active.set_tm(TimeAdjust::Offset(-3600), TimeField::End, Zone::Utc, now());
        assert_eq!(active.end, Some(now() - 3600));

        active.set_tm(TimeAdjust::Offset(60), TimeField::Start, Zone::Utc, now());
        assert_eq!(active.start_input.value, "2024-03-01T09:01:00");
    }

    #[test]
    fn to_input_trims_name_and_tags() {
        let mut active = ActiveRecord::from_record(&record(), Zone::Utc, now());
        active.name.set("  review ");
        active.tags.set(" Code ");
        let input = active.to_input().unwrap();
        assert_eq!(input.name, "review");
        assert_eq!(input.tags, "Code");
        assert_eq!(Some(input.start), record().start);
        assert_eq!(input.end, record().end);
    }

    #[test]
    fn text_input_edits_at_cursor() {
        let mut input = TextInput::from_str("héllo");
        input.move_left();
        input.move_left();
        input.backspace();
        input.insert('L');
        assert_eq!(input.value, "héLlo");
        let (before, after) = input.split_at_cursor();
        assert_eq!((before, after), ("héL", "lo"));
    }
}
