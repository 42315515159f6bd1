//! Mutation handlers: drag/reorder, completion toggle, move-to-slot, unpin.
//!
//! These are pure list-level operations; `board::Board` wires them to the
//! task store and the trigger dispatcher and re-runs categorization after
//! every mutation.

use chrono::NaiveDateTime;

use crate::categorize::Category;
use crate::error::TaskError;
use crate::task::{DaySlot, Task};

/// An in-flight drag, created at drag-start and consumed by a single
/// drag-end call. No shared mutable state: an abandoned session is just
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    category: Category,
    dragged: i64,
}

impl DragSession {
    pub fn new(category: Category, dragged: i64) -> Self {
        Self { category, dragged }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn dragged(&self) -> i64 {
        self.dragged
    }
}

/// Apply the final order of a bucket after a drag ends.
///
/// Only the dragged task is newly pinned; tasks that already had a manual
/// position are renumbered to match the new order, and untouched automatic
/// tasks stay automatic. Returns the ids whose `manual_position` changed.
pub fn apply_drag(tasks: &mut [Task], session: &DragSession, final_order: &[i64]) -> Vec<i64> {
    let mut changed = Vec::new();

    for (index, id) in final_order.iter().enumerate() {
        let Some(task) = tasks.iter_mut().find(|t| t.id == *id) else {
            continue;
        };
        let new_position = Some(index as u32);

        if *id == session.dragged || task.manual_position.is_some() {
            if task.manual_position != new_position {
                task.manual_position = new_position;
                changed.push(*id);
            }
        }
        // No manual position and not the dragged task: keep it automatic.
    }

    changed
}

/// Outcome of a completion toggle, for the caller to maintain reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    Unchanged,
    Completed,
    Uncompleted,
}

/// Toggle completion for a task (for daily tasks: for the instance at
/// `day_offset`).
///
/// A daily task may only be completed on its today instance; uncompleting
/// is allowed from anywhere. `completed_at` is set exactly on the false→true
/// transition and cleared on the way back.
pub fn set_completed(
    task: &mut Task,
    completed: bool,
    day_offset: u8,
    now: NaiveDateTime,
) -> Result<CompletionChange, TaskError> {
    if completed && task.is_daily() && day_offset != 0 {
        return Err(TaskError::WrongDayCompletion);
    }
    if task.completed == completed {
        return Ok(CompletionChange::Unchanged);
    }

    task.completed = completed;
    if completed {
        task.completed_at = Some(now);
        Ok(CompletionChange::Completed)
    } else {
        task.completed_at = None;
        Ok(CompletionChange::Uncompleted)
    }
}

/// Move a task to a different day slot (weekday, pseudo slot, or none =
/// waiting). Re-categorization picks up the new bucket.
pub fn move_to_slot(task: &mut Task, slot: Option<DaySlot>) {
    task.day_slot = slot;
}

/// Return a pinned task to automatic, time-based ordering.
pub fn unpin(task: &mut Task) {
    task.manual_position = None;
}
