//! In-bucket ordering policy.
//!
//! Manual tasks stay exactly where the user put them, automatic tasks sort
//! by time. The interleave rule maps a manual position onto a representative
//! hour (0→3, 1→9, 2→15, 3+→21) and compares automatic tasks against it at
//! hour granularity, manual winning exact-hour ties. The quantization is
//! load-bearing: changing it changes observed drag-and-drop order.

use std::cmp::Ordering;

use crate::task::Task;

/// Representative hour for a manual position.
fn position_hour(position: u32) -> u32 {
    match position {
        0 => 3,  // early morning
        1 => 9,  // morning
        2 => 15, // afternoon
        _ => 21, // evening
    }
}

/// Total order applied within every bucket except Completed.
pub fn task_order(a: &Task, b: &Task) -> Ordering {
    match (a.manual_position, b.manual_position) {
        // Both manual: position decides.
        (Some(pa), Some(pb)) => pa.cmp(&pb),

        // Both automatic: time, then priority; timed before untimed.
        (None, None) => match (a.due_time, b.due_time) {
            (Some(ta), Some(tb)) => ta
                .millis()
                .cmp(&tb.millis())
                .then_with(|| a.priority.cmp(&b.priority)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.priority.cmp(&b.priority),
        },

        // Mixed: order the automatic task around the manual anchor.
        (Some(pos), None) => auto_vs_manual(b, pos).reverse(),
        (None, Some(pos)) => auto_vs_manual(a, pos),
    }
}

/// Ordering of an automatic task relative to a manual one at `position`.
fn auto_vs_manual(auto: &Task, position: u32) -> Ordering {
    // Untimed automatic tasks always go after every manual task.
    let Some(time) = auto.due_time else {
        return Ordering::Greater;
    };
    if time.hour() < position_hour(position) {
        Ordering::Less
    } else {
        // Same hour bucket: the manual task keeps its anchored spot.
        Ordering::Greater
    }
}

/// Ordering for the Completed bucket: most recently completed first,
/// missing completion instants last.
pub fn completed_order(a: &Task, b: &Task) -> Ordering {
    match (a.completed_at, b.completed_at) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(ta), Some(tb)) => tb.cmp(&ta),
    }
}
