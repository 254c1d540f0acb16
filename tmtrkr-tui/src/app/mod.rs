use crate::config::{TimezoneMode, TrackerConfig};
use crate::format::{self, DayBucket, Locale, Zone};
use crate::types::{Filter, Record, RecordList};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

mod editor;
mod filter;
mod state;
pub use state::{
    ActiveRecord, EditField, FilterEditState, FilterField, TextInput, TimeAdjust, TimeField, View,
};

pub struct App {
    pub running: bool,
    pub dev_mode: bool,
    /// Name of the signed-in user, from the session or the listing.
    pub user: Option<String>,
    pub status_message: Option<String>,

    // Last fetched listing, newest first
    pub data: RecordList,
    /// Index into `visible_records()`.
    pub focused_index: Option<usize>,
    /// Rows skipped from the top of the listing (day headers included).
    pub scroll: usize,

    pub active_record: Option<ActiveRecord>,

    pub filter: Filter,
    pub filter_edit: Option<FilterEditState>,

    pub zone: Zone,
    pub zone_local: Zone,
    pub locale: Locale,

    pub is_loading: bool,
}

impl App {
    pub fn new(cfg: &TrackerConfig, zone_local: Zone) -> Self {
        let zone = match cfg.timezone {
            TimezoneMode::Local => zone_local,
            TimezoneMode::Utc => Zone::Utc,
        };
        Self {
            running: true,
            dev_mode: false,
            user: None,
            status_message: None,
            data: RecordList::default(),
            focused_index: None,
            scroll: 0,
            active_record: None,
            filter: Filter::default(),
            filter_edit: None,
            zone,
            zone_local,
            locale: cfg.locale,
            is_loading: false,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// The view follows from which overlay state is present.
    pub fn current_view(&self) -> View {
        match (&self.active_record, &self.filter_edit) {
            (Some(active), _) if active.delete_id.is_some() => View::ConfirmDelete,
            (Some(_), _) => View::EditRecord,
            (None, Some(_)) => View::Filter,
            (None, None) => View::Records,
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Replace the listing with a fresh fetch, keeping the selection in range.
    pub fn set_records(&mut self, list: RecordList) {
        if let Some(user) = &list.user {
            self.user = Some(user.name.clone());
        }
        self.data = list;
        self.clamp_focus();
    }

    /// Records shown in the listing: all fetched records, narrowed by the
    /// filter's `q` when set. Listing order is kept.
    pub fn visible_records(&self) -> Vec<&Record> {
        let query = match self.filter.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => return self.data.records.iter().collect(),
        };

        let matcher = SkimMatcherV2::default();
        self.data
            .records
            .iter()
            .filter(|record| {
                let haystack = match &record.tags {
                    Some(tags) => format!("{} {}", record.name, tags),
                    None => record.name.clone(),
                };
                matcher.fuzzy_match(&haystack, query).is_some()
            })
            .collect()
    }

    pub fn records_by_day(&self, now: i64) -> Vec<DayBucket<'_>> {
        format::records_by_day(self.visible_records(), self.zone, self.locale, now)
    }

    /// Total duration of the visible records, in seconds.
    pub fn visible_duration(&self, now: i64) -> i64 {
        self.visible_records()
            .iter()
            .filter_map(|r| r.duration_at(now))
            .sum()
    }

    pub fn focused_record(&self) -> Option<&Record> {
        self.focused_index
            .and_then(|i| self.visible_records().get(i).copied())
    }

    pub fn select_next(&mut self) {
        let len = self.visible_records().len();
        if len == 0 {
            self.focused_index = None;
            return;
        }
        self.focused_index = Some(match self.focused_index {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        let len = self.visible_records().len();
        if len == 0 {
            self.focused_index = None;
            return;
        }
        self.focused_index = Some(match self.focused_index {
            Some(i) => i.saturating_sub(1),
            None => 0,
        });
    }

    pub(crate) fn clamp_focus(&mut self) {
        let len = self.visible_records().len();
        self.focused_index = match self.focused_index {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
    }

    /// Switch between UTC and the local zone. Returns true when the listing
    /// must be re-fetched because the date bounds moved.
    pub fn toggle_timezone(&mut self, now: i64) -> bool {
        self.zone = if self.zone == Zone::Utc {
            self.zone_local
        } else {
            Zone::Utc
        };
        let zone = self.zone;
        if let Some(active) = &mut self.active_record {
            active.refresh_inputs(zone, now);
        }
        self.set_status(format!("Timezone: {}", zone.label()));
        self.filter.start_a.is_some() || self.filter.start_b.is_some()
    }

    pub fn toggle_locale(&mut self) {
        self.locale = match self.locale {
            Locale::System => Locale::EnUs,
            Locale::EnUs => Locale::System,
        };
        self.set_status(format!("Locale: {}", self.locale.name()));
    }
}
