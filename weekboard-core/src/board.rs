//! Board kernel: ties the task store and trigger dispatcher collaborators
//! to the pure engine pieces.
//!
//! The kernel is synchronous and single-writer: callers serialize mutations
//! (one in flight at a time) and re-read the categorized view afterwards.
//! Every view is recomputed from a full store read; nothing is incremental.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::categorize::{self, Category, CategoryGroup};
use crate::error::TaskError;
use crate::mutations::{self, CompletionChange, DragSession};
use crate::reminders;
use crate::task::{DaySlot, Task};

/// Task persistence collaborator. The engine tolerates eventually-consistent
/// reads: it always recomputes from whatever snapshot `all` returns.
pub trait TaskStore {
    fn all(&self) -> Vec<Task>;
    fn get(&self, id: i64) -> Option<Task>;
    /// Insert a task, assigning an id when `task.id == 0`. Returns the id.
    fn insert(&mut self, task: Task) -> i64;
    fn update(&mut self, task: Task);
    fn delete(&mut self, id: i64);
}

/// Reminder timer collaborator, keyed by task id. Scheduling twice for the
/// same id replaces the prior trigger.
pub trait TriggerDispatcher {
    fn schedule(&mut self, task_id: i64, at: NaiveDateTime);
    fn cancel(&mut self, task_id: i64);

    /// Snooze: re-fire a fixed 5 minutes from now, bypassing trigger
    /// computation.
    fn schedule_snooze(&mut self, task_id: i64, now: NaiveDateTime) {
        self.schedule(task_id, reminders::snooze_trigger(now));
    }
}

/// In-memory store for tests and demos. Iterates in id order so that views
/// derived from `all` are deterministic.
#[derive(Debug)]
pub struct MemoryStore {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { tasks: BTreeMap::new(), next_id: 1 }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for MemoryStore {
    fn all(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    fn get(&self, id: i64) -> Option<Task> {
        self.tasks.get(&id).cloned()
    }

    fn insert(&mut self, mut task: Task) -> i64 {
        if task.id == 0 {
            task.id = self.next_id;
        }
        self.next_id = self.next_id.max(task.id) + 1;
        let id = task.id;
        self.tasks.insert(id, task);
        id
    }

    fn update(&mut self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    fn delete(&mut self, id: i64) {
        self.tasks.remove(&id);
    }
}

/// The engine kernel. All mutations validate at this boundary, write
/// through the store, and keep reminder scheduling in sync.
#[derive(Debug)]
pub struct Board<S: TaskStore, D: TriggerDispatcher> {
    store: S,
    dispatcher: D,
}

impl<S: TaskStore, D: TriggerDispatcher> Board<S, D> {
    pub fn new(store: S, dispatcher: D) -> Self {
        Self { store, dispatcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Categorized view for the presentation layer.
    pub fn view(&self, query: &str, include_completed: bool, today: NaiveDate) -> Vec<CategoryGroup> {
        categorize::categorize(&self.store.all(), query, include_completed, today)
    }

    pub fn add_task(&mut self, task: Task, now: NaiveDateTime) -> Result<i64, TaskError> {
        task.validate()?;
        let id = self.store.insert(task);
        if let Some(stored) = self.store.get(id) {
            self.sync_reminder(&stored, now);
        }
        debug!(task_id = id, "task added");
        Ok(id)
    }

    pub fn update_task(&mut self, task: Task, now: NaiveDateTime) -> Result<(), TaskError> {
        task.validate()?;
        if self.store.get(task.id).is_none() {
            return Err(TaskError::UnknownTask(task.id));
        }
        self.sync_reminder(&task, now);
        self.store.update(task);
        Ok(())
    }

    pub fn remove_task(&mut self, id: i64) -> Result<(), TaskError> {
        if self.store.get(id).is_none() {
            return Err(TaskError::UnknownTask(id));
        }
        self.dispatcher.cancel(id);
        self.store.delete(id);
        Ok(())
    }

    /// Completion toggle. Completing cancels a pending reminder;
    /// uncompleting re-computes and re-schedules it.
    pub fn set_completed(
        &mut self,
        id: i64,
        completed: bool,
        day_offset: u8,
        now: NaiveDateTime,
    ) -> Result<(), TaskError> {
        let mut task = self.store.get(id).ok_or(TaskError::UnknownTask(id))?;
        match mutations::set_completed(&mut task, completed, day_offset, now)? {
            CompletionChange::Unchanged => return Ok(()),
            CompletionChange::Completed => {
                if task.reminder_lead.is_some() {
                    self.dispatcher.cancel(id);
                }
            }
            CompletionChange::Uncompleted => self.sync_reminder(&task, now),
        }
        self.store.update(task);
        Ok(())
    }

    pub fn move_task(&mut self, id: i64, slot: Option<DaySlot>) -> Result<(), TaskError> {
        let mut task = self.store.get(id).ok_or(TaskError::UnknownTask(id))?;
        mutations::move_to_slot(&mut task, slot);
        self.store.update(task);
        Ok(())
    }

    pub fn unpin_task(&mut self, id: i64) -> Result<(), TaskError> {
        let mut task = self.store.get(id).ok_or(TaskError::UnknownTask(id))?;
        mutations::unpin(&mut task);
        self.store.update(task);
        Ok(())
    }

    /// Start a drag within a bucket. The returned session is consumed by
    /// exactly one `finish_drag` call.
    pub fn begin_drag(&self, category: Category, id: i64) -> Result<DragSession, TaskError> {
        if self.store.get(id).is_none() {
            return Err(TaskError::UnknownTask(id));
        }
        Ok(DragSession::new(category, id))
    }

    /// Finish a drag with the bucket's final id order. Returns how many
    /// tasks had their manual position updated.
    pub fn finish_drag(&mut self, session: DragSession, final_order: &[i64]) -> Result<usize, TaskError> {
        let mut tasks = self.store.all();
        let changed = mutations::apply_drag(&mut tasks, &session, final_order);
        for task in tasks {
            if changed.contains(&task.id) {
                self.store.update(task);
            }
        }
        debug!(
            dragged = session.dragged(),
            updated = changed.len(),
            "drag finished"
        );
        Ok(changed.len())
    }

    pub fn snooze(&mut self, id: i64, now: NaiveDateTime) -> Result<(), TaskError> {
        if self.store.get(id).is_none() {
            return Err(TaskError::UnknownTask(id));
        }
        self.dispatcher.schedule_snooze(id, now);
        Ok(())
    }

    /// Schedule or clear the reminder for a task. Completed tasks never
    /// keep a pending trigger.
    fn sync_reminder(&mut self, task: &Task, now: NaiveDateTime) {
        if task.completed {
            self.dispatcher.cancel(task.id);
            return;
        }
        match reminders::next_trigger(task, now) {
            Some(at) => self.dispatcher.schedule(task.id, at),
            None => self.dispatcher.cancel(task.id),
        }
    }
}
