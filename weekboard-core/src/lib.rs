//! weekboard-core: categorization and reminder-scheduling engine for a
//! rolling seven-day task board.
//!
//! The engine is pure and calendar-local: `categorize`, the ordering
//! comparators and `next_trigger` are plain functions of their inputs.
//! Persistence and actual reminder timers live behind the `TaskStore` and
//! `TriggerDispatcher` traits in `board`.

pub mod board;
pub mod calendar;
pub mod categorize;
pub mod error;
pub mod mutations;
pub mod ordering;
pub mod recurrence;
pub mod reminders;
pub mod task;

pub use board::{Board, MemoryStore, TaskStore, TriggerDispatcher};
pub use categorize::{BoardItem, Category, CategoryGroup, VirtualInstance, categorize};
pub use error::TaskError;
pub use mutations::{CompletionChange, DragSession, apply_drag, move_to_slot, set_completed, unpin};
pub use ordering::{completed_order, task_order};
pub use recurrence::{appears_on_offset, completed_on_offset, reminds_on_weekday};
pub use reminders::{ReminderState, SNOOZE_MINUTES, next_trigger, snooze_trigger};
pub use task::{DaySlot, RecurrenceKind, ReminderDays, Task, TimeOfDay};
