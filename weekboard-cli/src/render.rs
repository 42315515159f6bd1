//! Plain-text rendering of a categorized board. Display-only; all labels
//! come from the engine's closed category type.

use weekboard_core::CategoryGroup;

pub fn render_board(groups: &[CategoryGroup]) -> String {
    let mut out = String::new();

    if groups.is_empty() {
        out.push_str("(no tasks)\n");
        return out;
    }

    for group in groups {
        out.push_str(&format!("{} ({})\n", group.category, group.items.len()));
        for item in &group.items {
            let task = item.task();
            let check = if item.is_completed() { "x" } else { " " };
            let mut line = format!("  [{check}] {}", task.description);
            if let Some(time) = task.due_time {
                line.push_str(&format!("  @{time}"));
            }
            if let Some(date) = task.due_date {
                line.push_str(&format!("  due {date}"));
            }
            if task.is_recurring {
                line.push_str("  (recurring)");
            }
            if task.manual_position.is_some() {
                line.push_str("  (pinned)");
            }
            line.push('\n');
            out.push_str(&line);
        }
        out.push('\n');
    }

    out
}
