//! Task model for the seven-day board engine.
//!
//! We keep this small + serializable. Storage (sqlite, sync backends) is a
//! collaborator behind `board::TaskStore`; the engine only ever sees plain
//! `Task` values.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::TaskError;

/// Cadence of a recurring task.
///
/// Serialized with capitalized names ("Daily", "Weekly", ...) to match the
/// store format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

/// Day binding of a task: a concrete weekday, or one of the pseudo slots.
///
/// The store's `"None"` pseudo-label maps to `Option::None` on
/// `Task::day_slot`; both route to the same due-date/waiting logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySlot {
    /// Perform on this weekday (this week's occurrence).
    On(Weekday),
    /// Overdue / do-now. Merged into the today bucket for display.
    Immediate,
    /// Sometime soon, no concrete day.
    Soon,
}

impl DaySlot {
    pub fn label(&self) -> &'static str {
        match self {
            DaySlot::On(day) => calendar::weekday_label(*day),
            DaySlot::Immediate => "Immediate",
            DaySlot::Soon => "Soon",
        }
    }
}

impl fmt::Display for DaySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DaySlot {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("immediate") {
            return Ok(DaySlot::Immediate);
        }
        if trimmed.eq_ignore_ascii_case("soon") {
            return Ok(DaySlot::Soon);
        }
        calendar::parse_weekday(trimmed)
            .map(DaySlot::On)
            .ok_or_else(|| TaskError::UnknownLabel(s.to_string()))
    }
}

impl Serialize for DaySlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DaySlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Time of day as milliseconds since local midnight, `0 <= ms < 86_400_000`.
///
/// Daylight-unaware on purpose: the engine works in calendar-local wall
/// clock time and never converts across timezones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TimeOfDay(i64);

impl TimeOfDay {
    pub const MILLIS_PER_DAY: i64 = 86_400_000;

    pub fn from_millis(ms: i64) -> Result<Self, TaskError> {
        if (0..Self::MILLIS_PER_DAY).contains(&ms) {
            Ok(Self(ms))
        } else {
            Err(TaskError::InvalidTimeOfDay(ms))
        }
    }

    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TaskError> {
        Self::from_millis(i64::from(hour) * 3_600_000 + i64::from(minute) * 60_000)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Hour of day, 0..=23. The manual/automatic interleave heuristic
    /// compares at this granularity only.
    pub fn hour(&self) -> u32 {
        (self.0 / 3_600_000) as u32
    }

    pub fn minute(&self) -> u32 {
        ((self.0 % 3_600_000) / 60_000) as u32
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        let secs = (self.0 / 1_000) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
            .expect("time of day is range-checked at construction")
    }
}

impl TryFrom<i64> for TimeOfDay {
    type Error = TaskError;

    fn try_from(ms: i64) -> Result<Self, Self::Error> {
        Self::from_millis(ms)
    }
}

impl From<TimeOfDay> for i64 {
    fn from(t: TimeOfDay) -> i64 {
        t.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Weekday mask for daily-recurring reminders.
///
/// Empty means "remind every day". Serialized as a list of weekday indices,
/// 0=Sunday..6=Saturday, matching the store format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ReminderDays(u8);

impl ReminderDays {
    pub const EVERY_DAY: Self = Self(0);

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    /// True when no restriction is set (remind every day).
    pub fn is_unrestricted(&self) -> bool {
        self.0 == 0
    }

    pub fn indices(&self) -> Vec<u8> {
        (0u8..7).filter(|i| self.0 & (1 << i) != 0).collect()
    }

    fn bit(day: Weekday) -> u8 {
        1 << calendar::weekday_index(day)
    }
}

impl FromIterator<Weekday> for ReminderDays {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut mask = Self::EVERY_DAY;
        for day in iter {
            mask.insert(day);
        }
        mask
    }
}

impl TryFrom<Vec<u8>> for ReminderDays {
    type Error = TaskError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        let mut raw = 0u8;
        for idx in indices {
            if idx > 6 {
                return Err(TaskError::InvalidReminderDay(idx));
            }
            raw |= 1 << idx;
        }
        Ok(Self(raw))
    }
}

impl From<ReminderDays> for Vec<u8> {
    fn from(mask: ReminderDays) -> Vec<u8> {
        mask.indices()
    }
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity. 0 = not yet assigned; `MemoryStore` assigns on insert.
    pub id: i64,

    pub description: String,

    /// Absolute calendar date the task is due, no time component.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Due time of day, independent of `due_date`.
    #[serde(default)]
    pub due_time: Option<TimeOfDay>,

    /// Day binding. `None` means no specific day (waiting, unless a due
    /// date says otherwise).
    #[serde(default)]
    pub day_slot: Option<DaySlot>,

    #[serde(default)]
    pub is_recurring: bool,

    /// Required iff `is_recurring` (checked by `validate`).
    #[serde(default)]
    pub recurrence: Option<RecurrenceKind>,

    /// Reminder lead in minutes before `due_time` (0 = at the due time).
    /// `None` = no reminder.
    #[serde(default)]
    pub reminder_lead: Option<u32>,

    /// Only consulted for daily-recurring tasks.
    #[serde(default)]
    pub reminder_days: ReminderDays,

    #[serde(default)]
    pub completed: bool,

    /// Set exactly when `completed` flips to true, cleared on the way back.
    /// For recurring tasks this tracks only the latest completion event.
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,

    /// Present = user-pinned within its bucket; absent = automatic ordering.
    #[serde(default)]
    pub manual_position: Option<u32>,

    /// Ascending tie-breaker for automatic ordering. Lower sorts first.
    #[serde(default)]
    pub priority: i32,
}

impl Task {
    pub fn new(id: i64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            due_date: None,
            due_time: None,
            day_slot: None,
            is_recurring: false,
            recurrence: None,
            reminder_lead: None,
            reminder_days: ReminderDays::EVERY_DAY,
            completed: false,
            completed_at: None,
            manual_position: None,
            priority: 0,
        }
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn with_due_time(mut self, time: TimeOfDay) -> Self {
        self.due_time = Some(time);
        self
    }

    pub fn with_day_slot(mut self, slot: DaySlot) -> Self {
        self.day_slot = Some(slot);
        self
    }

    pub fn with_recurrence(mut self, kind: RecurrenceKind) -> Self {
        self.is_recurring = true;
        self.recurrence = Some(kind);
        self
    }

    pub fn with_reminder(mut self, lead_minutes: u32) -> Self {
        self.reminder_lead = Some(lead_minutes);
        self
    }

    pub fn with_reminder_days(mut self, mask: ReminderDays) -> Self {
        self.reminder_days = mask;
        self
    }

    pub fn with_manual_position(mut self, position: u32) -> Self {
        self.manual_position = Some(position);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_daily(&self) -> bool {
        self.is_recurring && self.recurrence == Some(RecurrenceKind::Daily)
    }

    /// Boundary validation: invalid tasks are rejected before they reach
    /// categorization or the store.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.description.trim().is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        if self.is_recurring && self.recurrence.is_none() {
            return Err(TaskError::MissingRecurrenceKind);
        }
        Ok(())
    }
}
