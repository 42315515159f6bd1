//! Categorization engine: buckets every task into the rolling seven-day
//! window plus Soon / Waiting / Completed, fanning daily-recurring tasks
//! into one virtual instance per day.
//!
//! The whole pass is a pure function of `(tasks, query, include_completed,
//! today)` — it always recomputes from the full list, never incrementally.

use chrono::{NaiveDate, Weekday};
use std::fmt;
use tracing::warn;

use crate::calendar;
use crate::ordering;
use crate::recurrence;
use crate::task::{DaySlot, Task};

/// Bucket label, in fixed presentation order: today..today+6, Soon,
/// Waiting, Completed. The overdue bucket is merged into today before
/// ordering and never shows up as its own label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Day(Weekday),
    Soon,
    Waiting,
    Completed,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Day(day) => calendar::weekday_label(*day),
            Category::Soon => "Soon",
            Category::Waiting => "Waiting",
            Category::Completed => "Completed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ephemeral per-day copy of a daily-recurring task. Never written back to
/// the store; the tagged union below makes that unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualInstance {
    /// Snapshot of the source task (shares its id).
    pub source: Task,
    /// 0 = today .. 6.
    pub day_offset: u8,
    /// Per-day completion view: true only for the today instance of a
    /// completed source.
    pub completed: bool,
}

/// A bucket entry: either a real stored task or a display-only virtual
/// instance of a daily-recurring one.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardItem {
    Real(Task),
    Virtual(VirtualInstance),
}

impl BoardItem {
    pub fn task(&self) -> &Task {
        match self {
            BoardItem::Real(task) => task,
            BoardItem::Virtual(instance) => &instance.source,
        }
    }

    pub fn id(&self) -> i64 {
        self.task().id
    }

    pub fn is_completed(&self) -> bool {
        match self {
            BoardItem::Real(task) => task.completed,
            BoardItem::Virtual(instance) => instance.completed,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, BoardItem::Virtual(_))
    }
}

/// One displayed bucket: label plus its ordered entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: Category,
    pub items: Vec<BoardItem>,
}

/// Where a single (non-daily) task lands before bucket assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Immediate,
    Day(u8),
    Soon,
    Waiting,
    Completed,
}

/// Classify one task. Precedence: completed (non-recurring, with a
/// completion instant) → overdue due date → day slot → due date window →
/// waiting.
fn place(task: &Task, today: NaiveDate) -> Placement {
    if !task.is_recurring && task.completed {
        if task.completed_at.is_some() {
            return Placement::Completed;
        }
        // Data defect: completed without an instant. Falls through to
        // day-based classification.
        warn!(task_id = task.id, "completed task missing completion instant");
    }

    // A past due date wins over any day binding.
    if let Some(due) = task.due_date
        && calendar::days_between(due, today) < 0
    {
        return Placement::Immediate;
    }

    match task.day_slot {
        Some(DaySlot::Immediate) => Placement::Immediate,
        Some(DaySlot::Soon) => Placement::Soon,
        Some(DaySlot::On(day)) => Placement::Day(calendar::offset_for_weekday(today, day)),
        None => match task.due_date {
            Some(due) if calendar::within_next_week(due, today) => {
                Placement::Day(calendar::days_between(due, today) as u8)
            }
            Some(_) => Placement::Waiting,
            None => Placement::Waiting,
        },
    }
}

/// Bucket, filter and order the full task list.
///
/// `query` is a case-insensitive substring filter on descriptions; tasks
/// that miss it are dropped entirely, including completed ones. While a
/// search is active the Completed bucket is suppressed unless
/// `include_completed`. Empty buckets are omitted.
pub fn categorize(
    tasks: &[Task],
    query: &str,
    include_completed: bool,
    today: NaiveDate,
) -> Vec<CategoryGroup> {
    let query = query.trim().to_lowercase();
    let searching = !query.is_empty();

    let mut day_items: [Vec<BoardItem>; 7] = Default::default();
    let mut immediate: Vec<BoardItem> = Vec::new();
    let mut soon: Vec<BoardItem> = Vec::new();
    let mut waiting: Vec<BoardItem> = Vec::new();
    let mut completed: Vec<BoardItem> = Vec::new();

    for task in tasks {
        if searching && !task.description.to_lowercase().contains(&query) {
            continue;
        }

        if task.is_daily() {
            // One virtual instance per day bucket, completion gated to the
            // today instance.
            for offset in 0..7u8 {
                if !recurrence::appears_on_offset(task, offset) {
                    continue;
                }
                day_items[offset as usize].push(BoardItem::Virtual(VirtualInstance {
                    source: task.clone(),
                    day_offset: offset,
                    completed: recurrence::completed_on_offset(task, offset),
                }));
            }
            continue;
        }

        if task.is_recurring && !recurrence::appears_this_week(task) {
            continue;
        }

        let item = BoardItem::Real(task.clone());
        match place(task, today) {
            Placement::Immediate => immediate.push(item),
            Placement::Day(offset) => day_items[offset as usize].push(item),
            Placement::Soon => soon.push(item),
            Placement::Waiting => waiting.push(item),
            Placement::Completed => completed.push(item),
        }
    }

    let by_task = |a: &BoardItem, b: &BoardItem| ordering::task_order(a.task(), b.task());

    let mut groups = Vec::new();
    for (offset, mut items) in day_items.into_iter().enumerate() {
        if offset == 0 {
            // Overdue tasks are not a separate category: they join today.
            items.append(&mut immediate);
        }
        items.sort_by(by_task);
        if !items.is_empty() {
            groups.push(CategoryGroup {
                category: Category::Day(calendar::label_for_offset(today, offset as u8)),
                items,
            });
        }
    }

    soon.sort_by(by_task);
    if !soon.is_empty() {
        groups.push(CategoryGroup { category: Category::Soon, items: soon });
    }

    waiting.sort_by(by_task);
    if !waiting.is_empty() {
        groups.push(CategoryGroup { category: Category::Waiting, items: waiting });
    }

    let show_completed = !searching || include_completed;
    if show_completed {
        completed.sort_by(|a, b| ordering::completed_order(a.task(), b.task()));
        if !completed.is_empty() {
            groups.push(CategoryGroup { category: Category::Completed, items: completed });
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{RecurrenceKind, Task, TimeOfDay};
    use chrono::NaiveDate;

    // 2026-08-03 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
    }

    fn find<'a>(groups: &'a [CategoryGroup], category: Category) -> Option<&'a CategoryGroup> {
        groups.iter().find(|g| g.category == category)
    }

    #[test]
    fn past_due_date_lands_in_today_never_waiting() {
        let overdue = Task::new(1, "file taxes")
            .with_due_date(NaiveDate::from_ymd_opt(2026, 7, 20).unwrap());
        let groups = categorize(&[overdue], "", false, monday());

        let today = find(&groups, Category::Day(Weekday::Mon)).expect("today bucket");
        assert_eq!(today.items.len(), 1);
        assert!(find(&groups, Category::Waiting).is_none());
    }

    #[test]
    fn overdue_wins_over_weekday_pin() {
        let t = Task::new(1, "renew passport")
            .with_day_slot(DaySlot::On(Weekday::Fri))
            .with_due_date(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        let groups = categorize(&[t], "", false, monday());
        assert!(find(&groups, Category::Day(Weekday::Mon)).is_some());
        assert!(find(&groups, Category::Day(Weekday::Fri)).is_none());
    }

    #[test]
    fn due_date_within_week_maps_to_its_day() {
        let t = Task::new(1, "dentist")
            .with_due_date(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()); // Thursday
        let groups = categorize(&[t], "", false, monday());
        assert!(find(&groups, Category::Day(Weekday::Thu)).is_some());
    }

    #[test]
    fn due_date_beyond_week_waits() {
        let t = Task::new(1, "renew lease")
            .with_due_date(NaiveDate::from_ymd_opt(2026, 8, 20).unwrap());
        let groups = categorize(&[t], "", false, monday());
        assert!(find(&groups, Category::Waiting).is_some());
    }

    #[test]
    fn pseudo_slots_route_to_their_buckets() {
        let soon = Task::new(1, "plan trip").with_day_slot(DaySlot::Soon);
        let urgent = Task::new(2, "call plumber").with_day_slot(DaySlot::Immediate);
        let idle = Task::new(3, "read book");
        let groups = categorize(&[soon, urgent, idle], "", false, monday());

        assert_eq!(find(&groups, Category::Soon).unwrap().items.len(), 1);
        // Immediate is merged into today.
        let today = find(&groups, Category::Day(Weekday::Mon)).unwrap();
        assert_eq!(today.items[0].id(), 2);
        assert_eq!(find(&groups, Category::Waiting).unwrap().items.len(), 1);
    }

    #[test]
    fn daily_task_fans_into_seven_instances_completed_today_only() {
        let mut daily = Task::new(9, "stretch").with_recurrence(RecurrenceKind::Daily);
        daily.completed = true;
        daily.completed_at = monday().and_hms_opt(7, 0, 0);

        let groups = categorize(&[daily], "", false, monday());
        let virtuals: Vec<&BoardItem> = groups
            .iter()
            .flat_map(|g| g.items.iter())
            .filter(|i| i.is_virtual())
            .collect();
        assert_eq!(virtuals.len(), 7);
        assert_eq!(virtuals.iter().filter(|i| i.is_completed()).count(), 1);

        // All seven day buckets exist, each holding one instance.
        for offset in 0..7u8 {
            let day = Category::Day(calendar::label_for_offset(monday(), offset));
            assert_eq!(find(&groups, day).unwrap().items.len(), 1);
        }
        // The completed bucket stays out of it.
        assert!(find(&groups, Category::Completed).is_none());
    }

    #[test]
    fn weekly_recurring_classifies_like_regular_with_shared_completion() {
        let mut weekly = Task::new(4, "report")
            .with_recurrence(RecurrenceKind::Weekly)
            .with_day_slot(DaySlot::On(Weekday::Wed));
        weekly.completed = true;
        weekly.completed_at = monday().and_hms_opt(10, 0, 0);

        let groups = categorize(&[weekly], "", false, monday());
        // Completed recurring tasks stay in their day bucket, not Completed.
        let wed = find(&groups, Category::Day(Weekday::Wed)).unwrap();
        assert!(wed.items[0].is_completed());
        assert!(find(&groups, Category::Completed).is_none());
    }

    #[test]
    fn completed_non_recurring_goes_to_completed() {
        let mut done = Task::new(5, "mow lawn")
            .with_due_date(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
        done.completed = true;
        done.completed_at = monday().and_hms_opt(8, 0, 0);

        let groups = categorize(&[done], "", false, monday());
        assert_eq!(find(&groups, Category::Completed).unwrap().items.len(), 1);
        assert!(find(&groups, Category::Day(Weekday::Mon)).is_none());
    }

    #[test]
    fn completed_without_instant_falls_through_to_day_classification() {
        let mut odd = Task::new(6, "ghost task")
            .with_due_date(NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()); // Tuesday
        odd.completed = true;
        // completed_at deliberately missing

        let groups = categorize(&[odd], "", false, monday());
        assert!(find(&groups, Category::Completed).is_none());
        assert!(find(&groups, Category::Day(Weekday::Tue)).is_some());
    }

    #[test]
    fn search_filters_all_buckets_and_gates_completed() {
        let mut done = Task::new(1, "buy milk");
        done.completed = true;
        done.completed_at = monday().and_hms_opt(9, 0, 0);
        let pending = Task::new(2, "buy stamps");
        let other = Task::new(3, "walk dog");

        let groups = categorize(&[done.clone(), pending.clone(), other], "buy", false, monday());
        assert!(find(&groups, Category::Completed).is_none());
        assert_eq!(find(&groups, Category::Waiting).unwrap().items.len(), 1);

        let groups = categorize(&[done, pending], "buy", true, monday());
        assert_eq!(find(&groups, Category::Completed).unwrap().items.len(), 1);
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let t = Task::new(1, "solo").with_day_slot(DaySlot::On(Weekday::Sat));
        let groups = categorize(&[t], "", false, monday());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, Category::Day(Weekday::Sat));
    }

    #[test]
    fn categorize_is_idempotent() {
        let tasks = vec![
            Task::new(1, "alpha").with_due_time(TimeOfDay::from_hm(9, 0).unwrap()),
            Task::new(2, "beta").with_manual_position(0),
            Task::new(3, "gamma").with_recurrence(RecurrenceKind::Daily),
            Task::new(4, "delta").with_day_slot(DaySlot::Soon),
        ];
        let first = categorize(&tasks, "", false, monday());
        let second = categorize(&tasks, "", false, monday());
        assert_eq!(first, second);
    }
}
