use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::format::{self, Zone};

/// A time record as returned by tmtrkr-api. Instants are epoch seconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tags: Option<String>,
    /// Older rows may have no start.
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
    /// Server-side duration in seconds, computed at fetch time.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Record {
    /// Duration in whole seconds.
    ///
    /// Prefers the server value. Otherwise an unfinished record runs until `now`,
    /// and a record without a start, or starting after both `now` and its end,
    /// has no duration.
    pub fn duration_at(&self, now: i64) -> Option<i64> {
        if let Some(duration) = self.duration {
            return Some(duration.round() as i64);
        }
        derive_duration(self.start?, self.end, now)
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }
}

pub(crate) fn derive_duration(start: i64, end: Option<i64>, now: i64) -> Option<i64> {
    let end = end.unwrap_or(now);
    if start > now.max(end) {
        return None;
    }
    Some(end - start)
}

/// The record listing, `GET /api/records/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RecordList {
    pub records: Vec<Record>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub start_min: Option<i64>,
    #[serde(default)]
    pub start_max: Option<i64>,
    #[serde(default)]
    pub end_min: Option<i64>,
    #[serde(default)]
    pub end_max: Option<i64>,
    #[serde(default)]
    pub query_start_min: Option<i64>,
    #[serde(default)]
    pub query_start_max: Option<i64>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Date range (and free-text query) restricting the record listing.
///
/// `start_a` and `start_b` are `YYYY-MM-DD` strings. `q` is never sent to the
/// server; it narrows the fetched listing locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub start_a: Option<String>,
    pub start_b: Option<String>,
    pub q: Option<String>,
}

/// Query parameters for the record listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub start_min: Option<i64>,
    pub start_max: Option<i64>,
}

impl Filter {
    /// `start_a` from 00:00:00 and `start_b` till 23:59:59, both in `zone`.
    /// Unparsable dates are left out of the query.
    pub fn query(&self, zone: Zone) -> RecordQuery {
        let bound = |value: &Option<String>, time: Time| {
            let date = format::parse_yymd(value.as_deref()?)?;
            Some(day_instant(date, time, zone))
        };
        RecordQuery {
            start_min: bound(&self.start_a, Time::MIDNIGHT),
            start_max: bound(&self.start_b, time::macros::time!(23:59:59)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_a.is_none() && self.start_b.is_none() && self.q.is_none()
    }
}

fn day_instant(date: Date, time: Time, zone: Zone) -> i64 {
    date.with_time(time)
        .assume_offset(zone.offset())
        .unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    fn record(start: i64, end: Option<i64>, duration: Option<f64>) -> Record {
        Record {
            id: 1,
            name: "r".to_string(),
            tags: None,
            start: Some(start),
            end,
            duration,
            is_deleted: None,
            user_id: None,
        }
    }

    #[test]
    fn duration_prefers_server_value() {
        assert_eq!(record(0, Some(10), Some(99.6)).duration_at(1000), Some(100));
    }

    #[test]
    fn duration_of_unfinished_record_runs_until_now() {
        assert_eq!(record(100, None, None).duration_at(160), Some(60));
    }

    #[test]
    fn future_unfinished_record_has_no_duration() {
        assert_eq!(record(500, None, None).duration_at(100), None);
    }

    #[test]
    fn record_without_start_has_no_duration() {
        let mut r = record(0, Some(400), None);
        r.start = None;
        assert_eq!(r.duration_at(1000), None);
        assert_eq!(r.duration_at(0), None);
    }

    #[test]
    fn finished_record_duration_is_end_minus_start() {
        assert_eq!(record(100, Some(400), None).duration_at(0), Some(300));
    }

    #[test]
    fn filter_query_covers_whole_days_in_utc() {
        let filter = Filter {
            start_a: Some("2024-03-01".to_string()),
            start_b: Some("2024-03-02".to_string()),
            q: None,
        };
        let query = filter.query(Zone::Utc);
        assert_eq!(query.start_min, Some(1_709_251_200));
        assert_eq!(query.start_max, Some(1_709_251_200 + 2 * 86_400 - 1));
    }

    #[test]
    fn filter_query_shifts_to_local_midnight() {
        let filter = Filter {
            start_a: Some("2024-03-01".to_string()),
            start_b: None,
            q: None,
        };
        let query = filter.query(Zone::Local(offset!(+2)));
        assert_eq!(query.start_min, Some(1_709_251_200 - 2 * 3600));
        assert_eq!(query.start_max, None);
    }

    #[test]
    fn filter_query_skips_unparsable_dates() {
        let filter = Filter {
            start_a: Some("yesterday".to_string()),
            start_b: None,
            q: None,
        };
        assert_eq!(filter.query(Zone::Utc), RecordQuery::default());
    }

    #[test]
    fn record_list_tolerates_missing_aggregates() {
        let list: RecordList = serde_json::from_str(
            r#"{"records":[{"id":3,"name":"x","start":10,"end":null,"tags":"a b"}],"count":1}"#,
        )
        .unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.records[0].tags.as_deref(), Some("a b"));
        assert!(list.records[0].is_running());
        assert_eq!(list.user, None);
    }

    #[test]
    fn record_list_keeps_rows_without_start() {
        let list: RecordList = serde_json::from_str(
            r#"{"records":[{"id":1,"name":"ok","start":100,"end":200},{"id":2,"name":"legacy","start":null,"end":50}],"count":2}"#,
        )
        .unwrap();
        assert_eq!(list.records.len(), 2);
        assert_eq!(list.records[0].duration_at(300), Some(100));
        assert_eq!(list.records[1].start, None);
        assert_eq!(list.records[1].duration_at(300), None);
    }
}
