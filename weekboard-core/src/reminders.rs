//! Reminder trigger computation.
//!
//! `next_trigger` is pure given `(task, now)`: it either produces a
//! strictly-future instant or decides no reminder is due. The dispatcher
//! that owns actual timers is a collaborator behind
//! `board::TriggerDispatcher`.

use chrono::{Datelike, Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::calendar;
use crate::recurrence;
use crate::task::{DaySlot, Task};

/// Fixed snooze offset: a snoozed reminder re-fires this many minutes from
/// "now", bypassing `next_trigger` entirely.
pub const SNOOZE_MINUTES: i64 = 5;

pub fn snooze_trigger(now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::minutes(SNOOZE_MINUTES)
}

/// Compute when the reminder for `task` should fire next, or `None` when no
/// reminder is due.
///
/// Rules, in order:
/// 1. No due time or no lead configured → no reminder.
/// 2. Daily task whose reminder-day mask excludes today → no reminder today.
///    The caller is expected to re-evaluate daily; we do not search forward.
/// 3. A due date pins the calendar date; a weekday slot advances to that
///    weekday's next occurrence (a full week out when it is today but the
///    lead-adjusted time already passed); otherwise the bare time-of-day is
///    pushed to tomorrow once it has passed today.
/// 4. A candidate still in the past is advanced by one day, twice at most;
///    after that the trigger degrades to now + 1h rather than silently
///    dropping a requested reminder.
pub fn next_trigger(task: &Task, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let time = task.due_time?;
    let lead = Duration::minutes(i64::from(task.reminder_lead?));

    let today = now.date();
    if task.is_daily() && !recurrence::reminds_on_weekday(task, today.weekday()) {
        debug!(task_id = task.id, "reminder masked off for today");
        return None;
    }

    let at = time.as_naive_time();
    let mut candidate = match (task.due_date, task.day_slot) {
        // A concrete due date pins the date part outright.
        (Some(date), _) => date.and_time(at) - lead,

        (None, Some(DaySlot::On(target))) => {
            let base = today.and_time(at) - lead;
            let mut advance = i64::from(calendar::offset_for_weekday(today, target));
            if advance == 0 && now > base {
                // Today's occurrence already passed: schedule for next week.
                advance = 7;
            }
            base + Duration::days(advance)
        }

        // Pseudo slot or no day binding: time-of-day only.
        _ => {
            let mut due = today.and_time(at);
            if due <= now {
                due += Duration::days(1);
            }
            due - lead
        }
    };

    for _ in 0..2 {
        if candidate <= now {
            candidate += Duration::days(1);
        }
    }
    if candidate <= now {
        // Degraded last resort; never drop a requested reminder.
        warn!(task_id = task.id, "trigger still in the past after adjustment, firing in 1h");
        candidate = now + Duration::hours(1);
    }

    Some(candidate)
}

/// Lifecycle of a scheduled reminder, owned by the trigger dispatcher and
/// observed by this engine only through its public calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    Unscheduled,
    Scheduled,
    Fired,
    Snoozed,
    Completed,
    Deleted,
    Cancelled,
}

impl ReminderState {
    /// Legal transitions:
    /// `Unscheduled → Scheduled → {Fired → (Snoozed → Scheduled) |
    /// Completed | Deleted | Cancelled}`.
    pub fn can_transition(self, next: ReminderState) -> bool {
        use ReminderState::*;
        matches!(
            (self, next),
            (Unscheduled, Scheduled)
                | (Scheduled, Fired)
                | (Scheduled, Completed)
                | (Scheduled, Deleted)
                | (Scheduled, Cancelled)
                | (Fired, Snoozed)
                | (Fired, Completed)
                | (Fired, Deleted)
                | (Snoozed, Scheduled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{RecurrenceKind, ReminderDays, Task, TimeOfDay};
    use chrono::{NaiveDate, Weekday};

    // 2026-08-03 is a Monday.
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn no_due_time_or_lead_means_no_reminder() {
        let no_time = Task::new(1, "a").with_reminder(10);
        assert_eq!(next_trigger(&no_time, monday_at(8, 0)), None);

        let no_lead = Task::new(2, "b").with_due_time(TimeOfDay::from_hm(9, 0).unwrap());
        assert_eq!(next_trigger(&no_lead, monday_at(8, 0)), None);
    }

    #[test]
    fn lead_time_before_upcoming_due_time_fires_today() {
        let task = Task::new(1, "standup")
            .with_due_time(TimeOfDay::from_hm(9, 0).unwrap())
            .with_reminder(15);
        assert_eq!(
            next_trigger(&task, monday_at(8, 0)),
            Some(at(2026, 8, 3, 8, 45))
        );
    }

    #[test]
    fn passed_due_time_rolls_to_tomorrow() {
        let task = Task::new(1, "standup")
            .with_due_time(TimeOfDay::from_hm(9, 0).unwrap())
            .with_reminder(15);
        assert_eq!(
            next_trigger(&task, monday_at(9, 10)),
            Some(at(2026, 8, 4, 8, 45))
        );
    }

    #[test]
    fn weekday_slot_targets_next_occurrence() {
        let task = Task::new(1, "trash day")
            .with_day_slot(DaySlot::On(Weekday::Wed))
            .with_due_time(TimeOfDay::from_hm(10, 0).unwrap())
            .with_reminder(0);
        // Evaluated on a Monday → upcoming Wednesday at 10:00.
        assert_eq!(
            next_trigger(&task, monday_at(12, 0)),
            Some(at(2026, 8, 5, 10, 0))
        );
    }

    #[test]
    fn weekday_slot_today_with_passed_time_jumps_a_week() {
        let task = Task::new(1, "weekly review")
            .with_day_slot(DaySlot::On(Weekday::Mon))
            .with_due_time(TimeOfDay::from_hm(10, 0).unwrap())
            .with_reminder(30);
        assert_eq!(
            next_trigger(&task, monday_at(11, 0)),
            Some(at(2026, 8, 10, 9, 30))
        );
    }

    #[test]
    fn due_date_pins_the_calendar_date() {
        let task = Task::new(1, "flight")
            .with_due_date(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap())
            .with_due_time(TimeOfDay::from_hm(6, 30).unwrap())
            .with_reminder(60);
        assert_eq!(
            next_trigger(&task, monday_at(8, 0)),
            Some(at(2026, 8, 7, 5, 30))
        );
    }

    #[test]
    fn stale_due_date_degrades_to_one_hour_fallback() {
        let task = Task::new(1, "ancient")
            .with_due_date(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap())
            .with_due_time(TimeOfDay::from_hm(9, 0).unwrap())
            .with_reminder(0);
        // Two one-day advances cannot reach the future from a month back.
        assert_eq!(
            next_trigger(&task, monday_at(8, 0)),
            Some(monday_at(9, 0))
        );
    }

    #[test]
    fn daily_mask_suppresses_off_days() {
        let mask: ReminderDays = [Weekday::Tue].into_iter().collect();
        let task = Task::new(1, "meds")
            .with_recurrence(RecurrenceKind::Daily)
            .with_due_time(TimeOfDay::from_hm(8, 0).unwrap())
            .with_reminder(0)
            .with_reminder_days(mask);
        // Monday is not in the mask: nothing today, no forward search.
        assert_eq!(next_trigger(&task, monday_at(6, 0)), None);

        let unmasked = Task::new(2, "meds")
            .with_recurrence(RecurrenceKind::Daily)
            .with_due_time(TimeOfDay::from_hm(8, 0).unwrap())
            .with_reminder(0);
        assert_eq!(
            next_trigger(&unmasked, monday_at(6, 0)),
            Some(monday_at(8, 0))
        );
    }

    #[test]
    fn trigger_is_always_strictly_future() {
        let task = Task::new(1, "x")
            .with_due_time(TimeOfDay::from_hm(0, 0).unwrap())
            .with_reminder(120);
        let now = monday_at(0, 0);
        let fired = next_trigger(&task, now).unwrap();
        assert!(fired > now);
    }

    #[test]
    fn lifecycle_transitions() {
        use ReminderState::*;
        assert!(Unscheduled.can_transition(Scheduled));
        assert!(Scheduled.can_transition(Fired));
        assert!(Fired.can_transition(Snoozed));
        assert!(Snoozed.can_transition(Scheduled));
        assert!(!Unscheduled.can_transition(Fired));
        assert!(!Completed.can_transition(Scheduled));
        assert!(!Fired.can_transition(Cancelled));
    }
}
