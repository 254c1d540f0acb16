//! Date, time and duration formatting for the record listing and editor.
//!
//! Everything here is pure: callers pass the active [`Zone`] and [`Locale`]
//! (and "now" where running records matter).

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::types::Record;

const SECS_PER_DAY: i64 = 60 * 60 * 24;
const SECS_PER_HOUR: i64 = 60 * 60;

/// Timezone used to display and enter instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Utc,
    Local(UtcOffset),
}

impl Zone {
    pub fn offset(self) -> UtcOffset {
        match self {
            Zone::Utc => UtcOffset::UTC,
            Zone::Local(offset) => offset,
        }
    }

    /// Short zone label, e.g. `UTC` or `UTC+02:00`.
    pub fn label(self) -> String {
        let offset = self.offset();
        if offset.is_utc() {
            return "UTC".to_string();
        }
        let (h, m, _) = offset.as_hms();
        let sign = if offset.is_negative() { '-' } else { '+' };
        format!("UTC{}{:02}:{:02}", sign, h.unsigned_abs(), m.unsigned_abs())
    }
}

/// Display conventions for dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    /// Day-first dates (`16 October 2026`).
    #[default]
    #[serde(rename = "system")]
    System,
    /// Month-first dates (`October 16, 2026`).
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub fn name(self) -> &'static str {
        match self {
            Locale::System => "default",
            Locale::EnUs => "en-US",
        }
    }
}

/// Current instant in epoch seconds.
pub fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

fn at(ts: i64, zone: Zone) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .map(|dt| dt.to_offset(zone.offset()))
}

fn short(name: impl ToString) -> String {
    name.to_string().chars().take(3).collect()
}

/// Long local date, e.g. `October 16, 2026`.
pub fn ts_date_fmt(ts: i64, zone: Zone, locale: Locale) -> String {
    let Some(dt) = at(ts, zone) else {
        return "-".to_string();
    };
    match locale {
        Locale::EnUs => format!("{} {}, {}", dt.month(), dt.day(), dt.year()),
        Locale::System => format!("{} {} {}", dt.day(), dt.month(), dt.year()),
    }
}

/// 24-hour `HH:MM` local time.
pub fn ts_time_fmt(ts: i64, zone: Zone) -> String {
    at(ts, zone)
        .map(|dt| format!("{:02}:{:02}", dt.hour(), dt.minute()))
        .unwrap_or_else(|| "-".to_string())
}

/// Weekday, date, time and zone, e.g. `Fri, Oct 16, 2026, 14:05 UTC`.
pub fn ts_fmt(ts: i64, zone: Zone, locale: Locale) -> String {
    let Some(dt) = at(ts, zone) else {
        return "-".to_string();
    };
    let weekday = short(dt.weekday());
    let month = short(dt.month());
    match locale {
        Locale::EnUs => format!(
            "{}, {} {}, {}, {:02}:{:02} {}",
            weekday,
            month,
            dt.day(),
            dt.year(),
            dt.hour(),
            dt.minute(),
            zone.label()
        ),
        Locale::System => format!(
            "{} {} {} {}, {:02}:{:02} {}",
            weekday,
            dt.day(),
            month,
            dt.year(),
            dt.hour(),
            dt.minute(),
            zone.label()
        ),
    }
}

/// The editor's input format, `YYYY-MM-DDTHH:MM:SS`.
pub fn ts_yymdhms(ts: i64, zone: Zone) -> String {
    at(ts, zone)
        .map(|dt| {
            format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                dt.year(),
                dt.month() as u8,
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            )
        })
        .unwrap_or_default()
}

pub fn ts_yymd(ts: i64, zone: Zone) -> String {
    at(ts, zone)
        .map(|dt| yymd(dt.date()))
        .unwrap_or_default()
}

pub fn yymd(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month() as u8, date.day())
}

/// Parse editor input (`YYYY-MM-DDTHH:MM[:SS]`, `T` or space separated) as a
/// wall-clock time in `zone`.
pub fn parse_yymdhms(input: &str, zone: Zone) -> Option<i64> {
    let normalized = input.trim().replacen(' ', "T", 1);
    let parsed = PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            &normalized,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
    })
    .ok()?;
    Some(parsed.assume_offset(zone.offset()).unix_timestamp())
}

pub fn parse_yymd(input: &str) -> Option<Date> {
    Date::parse(input.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Decimal hours with two places.
pub fn duration_hours_fmt(secs: i64) -> String {
    format!("{:.2}", secs as f64 / SECS_PER_HOUR as f64)
}

/// `HHh:MMm[:SSs]`, or `Dd HHh:MMm[:SSs]` past one day.
///
/// Seconds appear only when non-zero, negative durations get a `-` prefix, and
/// zero or absent durations render as `-`. `skip_days` folds days into hours.
pub fn duration_fmt(secs: Option<i64>, skip_days: bool) -> String {
    let secs = match secs {
        Some(s) if s != 0 => s,
        _ => return "-".to_string(),
    };
    let negative = secs < 0;
    let secs = secs.unsigned_abs() as i64;

    let d = if skip_days { 0 } else { secs / SECS_PER_DAY };
    let h = (secs - d * SECS_PER_DAY) / SECS_PER_HOUR;
    let m = (secs - d * SECS_PER_DAY - h * SECS_PER_HOUR) / 60;
    let s = secs % 60;

    let mut out = if d > 0 {
        format!("{}d {:02}h:{:02}m", d, h, m)
    } else {
        format!("{:02}h:{:02}m", h, m)
    };
    if s > 0 {
        out.push_str(&format!(":{:02}s", s));
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

/// ISO 8601 week of the local date: week 1 contains the year's first Thursday.
pub fn week_number(ts: i64, zone: Zone) -> Option<u8> {
    at(ts, zone).map(|dt| dt.iso_week())
}

/// Records sharing one formatted local date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<'a> {
    pub day: String,
    pub week: Option<u8>,
    pub records: Vec<&'a Record>,
    /// Sum of the known record durations, in seconds.
    pub duration: i64,
}

/// Bucket label for records without a start.
pub const NO_START_DAY: &str = "No start";

/// Group records by their formatted local date, keeping first-appearance order.
pub fn records_by_day<'a, I>(records: I, zone: Zone, locale: Locale, now: i64) -> Vec<DayBucket<'a>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buckets: Vec<DayBucket<'a>> = Vec::new();
    for record in records {
        let day = match record.start {
            Some(start) => ts_date_fmt(start, zone, locale),
            None => NO_START_DAY.to_string(),
        };
        let duration = record.duration_at(now).unwrap_or(0);
        match buckets.iter_mut().find(|b| b.day == day) {
            Some(bucket) => {
                bucket.records.push(record);
                bucket.duration += duration;
            }
            None => buckets.push(DayBucket {
                day,
                week: record.start.and_then(|start| week_number(start, zone)),
                records: vec![record],
                duration,
            }),
        }
    }
    buckets
}
