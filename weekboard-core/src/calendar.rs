//! Calendar arithmetic for the rolling seven-day window.
//!
//! Everything here is calendar-local: the engine never converts across
//! timezones. Day offsets are relative to a caller-supplied "today"
//! (0 = today, 6 = six days out), weekday indices are 0=Sunday..6=Saturday.

use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::TaskError;
use crate::task::DaySlot;

/// Weekday index with Sunday = 0, matching the stored reminder-day masks.
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let day = match s.trim().to_ascii_lowercase().as_str() {
        "sunday" => Weekday::Sun,
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        _ => return None,
    };
    Some(day)
}

fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// Weekday shown at `offset` days after `today`, wrapping Saturday→Sunday.
pub fn label_for_offset(today: NaiveDate, offset: u8) -> Weekday {
    weekday_from_index((weekday_index(today.weekday()) + offset % 7) % 7)
}

/// Offset of the next/today occurrence of `target` relative to `today`.
/// 0 when `target` is today's weekday.
pub fn offset_for_weekday(today: NaiveDate, target: Weekday) -> u8 {
    (weekday_index(target) + 7 - weekday_index(today.weekday())) % 7
}

/// Signed day difference `date - today`: negative = past (overdue).
pub fn days_between(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

/// True when `date` falls inside the rolling window [today, today+7).
pub fn within_next_week(date: NaiveDate, today: NaiveDate) -> bool {
    (0..7).contains(&days_between(date, today))
}

/// Parse a stored day label into a slot. `"None"` means "no specific day"
/// and maps to `Ok(None)`.
///
/// Unknown labels are a distinct error, never a silent default: callers fall
/// back to the waiting bucket and keep going, but get to surface the defect.
pub fn parse_day_label(raw: &str) -> Result<Option<DaySlot>, TaskError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed.parse::<DaySlot>().map(Some)
}

/// Current wall-clock time in an IANA timezone, as the naive local datetime
/// the engine works with. Boundary helper for callers that pin their board
/// to a configured timezone instead of the system locale.
pub fn now_in_tz(tz: &str) -> Result<NaiveDateTime> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}
