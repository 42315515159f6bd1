//! Engine error taxonomy.
//!
//! Everything here is a boundary rejection: invalid tasks and illegal
//! mutations never reach categorization, and categorization itself is total
//! (worst case a task lands in Waiting with a logged warning).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task description must be non-empty")]
    EmptyDescription,

    #[error("recurring task is missing a recurrence kind")]
    MissingRecurrenceKind,

    #[error("unknown day label: {0:?}")]
    UnknownLabel(String),

    #[error("time of day out of range: {0} ms since midnight")]
    InvalidTimeOfDay(i64),

    #[error("reminder day index out of range: {0} (expected 0..=6)")]
    InvalidReminderDay(u8),

    #[error("a daily task can only be completed on its today instance")]
    WrongDayCompletion,

    #[error("no task with id {0}")]
    UnknownTask(i64),
}
