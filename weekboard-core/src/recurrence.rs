//! Recurrence policy: which day instances a recurring task produces, and
//! how completion is shown per instance.

use chrono::Weekday;

use crate::task::Task;

/// Whether a task produces an instance on the given day offset (0 = today).
///
/// Daily tasks appear once in every day bucket. Weekly, biweekly, monthly
/// and yearly tasks currently always appear this week: their cadence is not
/// evaluated against an anchor date. Per-instance completion history is not
/// tracked either; `Task::completed` is shared across occurrences.
pub fn appears_on_offset(_task: &Task, _day_offset: u8) -> bool {
    true
}

/// Week-level form of `appears_on_offset` used for non-daily recurring
/// tasks, which get a single instance placed like a regular task.
pub fn appears_this_week(task: &Task) -> bool {
    appears_on_offset(task, 0)
}

/// Completion state shown for the instance at `day_offset`.
///
/// A daily task only shows as completed on the today instance; the other
/// six instances are always pending. Non-daily tasks mirror the shared flag
/// unchanged.
pub fn completed_on_offset(task: &Task, day_offset: u8) -> bool {
    if task.is_daily() {
        day_offset == 0 && task.completed
    } else {
        task.completed
    }
}

/// Whether a reminder is active on `day`. An empty mask means every day;
/// the mask is only meaningful for daily-recurring tasks.
pub fn reminds_on_weekday(task: &Task, day: Weekday) -> bool {
    task.reminder_days.is_unrestricted() || task.reminder_days.contains(day)
}
