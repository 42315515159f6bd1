use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Weekday};
use clap::{Parser, Subcommand};
use weekboard_core::{
    Board, DaySlot, MemoryStore, RecurrenceKind, ReminderDays, Task, TimeOfDay,
    TriggerDispatcher, calendar, next_trigger,
};

mod render;

#[derive(Parser, Debug)]
#[command(name = "weekboard", version, about = "Seven-day task board")]
struct Cli {
    /// Resolve "now" in this IANA timezone instead of the system locale
    #[arg(long, global = true)]
    tz: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the categorized board from a JSON task file
    Show {
        /// Path to a JSON array of tasks
        file: PathBuf,

        /// Case-insensitive substring filter on task descriptions
        #[arg(long, default_value = "")]
        query: String,

        /// Keep the Completed bucket visible while a search is active
        #[arg(long, default_value_t = false)]
        include_completed: bool,
    },

    /// Print the next reminder trigger for every task in the file
    Triggers {
        /// Path to a JSON array of tasks
        file: PathBuf,
    },

    /// Render a seeded demo board
    Demo,
}

/// Demo dispatcher: logs instead of arming timers.
#[derive(Debug, Default)]
struct LoggingDispatcher;

impl TriggerDispatcher for LoggingDispatcher {
    fn schedule(&mut self, task_id: i64, at: NaiveDateTime) {
        tracing::info!(task_id, %at, "trigger scheduled");
    }

    fn cancel(&mut self, task_id: i64) {
        tracing::info!(task_id, "trigger cancelled");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let now = resolve_now(cli.tz.as_deref())?;

    match cli.command {
        Command::Show { file, query, include_completed } => {
            let tasks = load_tasks(&file)?;
            let groups = weekboard_core::categorize(&tasks, &query, include_completed, now.date());
            print!("{}", render::render_board(&groups));
        }
        Command::Triggers { file } => {
            let tasks = load_tasks(&file)?;
            for task in &tasks {
                match next_trigger(task, now) {
                    Some(at) => println!("{:>4}  {}  fires {at}", task.id, task.description),
                    None => println!("{:>4}  {}  no reminder", task.id, task.description),
                }
            }
        }
        Command::Demo => {
            let mut board = Board::new(MemoryStore::new(), LoggingDispatcher);
            seed_demo(&mut board, now)?;
            let groups = board.view("", false, now.date());
            print!("{}", render::render_board(&groups));
        }
    }

    Ok(())
}

fn resolve_now(tz: Option<&str>) -> Result<NaiveDateTime> {
    match tz {
        Some(tz) => calendar::now_in_tz(tz),
        None => Ok(Local::now().naive_local()),
    }
}

fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read task file {}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse task file {}", path.display()))?;
    for task in &tasks {
        task.validate()
            .with_context(|| format!("invalid task {} ({:?})", task.id, task.description))?;
    }
    Ok(tasks)
}

fn seed_demo(board: &mut Board<MemoryStore, LoggingDispatcher>, now: NaiveDateTime) -> Result<()> {
    let today = now.date();

    board.add_task(
        Task::new(0, "morning stretch")
            .with_recurrence(RecurrenceKind::Daily)
            .with_due_time(TimeOfDay::from_hm(7, 30)?)
            .with_reminder(0)
            .with_reminder_days([Weekday::Mon, Weekday::Wed, Weekday::Fri].into_iter().collect::<ReminderDays>()),
        now,
    )?;
    board.add_task(
        Task::new(0, "team standup")
            .with_day_slot(DaySlot::On(calendar::label_for_offset(today, 1)))
            .with_due_time(TimeOfDay::from_hm(9, 0)?)
            .with_reminder(15),
        now,
    )?;
    board.add_task(
        Task::new(0, "file expense report")
            .with_due_date(today - chrono::Duration::days(3)),
        now,
    )?;
    board.add_task(Task::new(0, "plan vacation").with_day_slot(DaySlot::Soon), now)?;
    board.add_task(
        Task::new(0, "renew library card").with_due_date(today + chrono::Duration::days(12)),
        now,
    )?;

    let done = board.add_task(Task::new(0, "water plants"), now)?;
    board.set_completed(done, true, 0, now)?;

    Ok(())
}
