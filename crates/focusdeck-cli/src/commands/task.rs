use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::Subcommand;
use focusdeck_core::{
    Applied, Config, MoveTarget, Priority, RestStore, StaticIdentity, Subtask, Task, TaskDraft,
    TaskEngine, TaskPatch, TaskStatus,
};

use super::TerminalSink;

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks in board order
    List {
        /// Group into agenda buckets (Overdue, Today, ...)
        #[arg(long)]
        group: bool,
        /// Print raw task JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a task
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// One of the card palette names
        #[arg(long)]
        color: Option<String>,
    },
    /// Move a task to another column (--status) or due day (--due)
    Move {
        id: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Mark a task done
    Done { id: String },
    /// Edit task details
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Append a checklist entry
    SubtaskAdd { id: String, title: String },
    /// Toggle a checklist entry by position
    Subtask { id: String, index: usize },
    /// Delete a task (irreversible)
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

type Engine = TaskEngine<RestStore, StaticIdentity, TerminalSink>;

fn build_engine(config: &Config) -> Result<Engine, Box<dyn std::error::Error>> {
    if !config.remote.is_configured() {
        return Err("remote store not configured; set remote.base_url, remote.api_key and \
             remote.owner_id with `focusdeck config set`"
            .into());
    }
    let store = RestStore::new(&config.remote.base_url, &config.remote.api_key)?;
    let identity = if config.remote.owner_id.is_empty() {
        StaticIdentity::anonymous()
    } else {
        StaticIdentity::new(config.remote.owner_id.as_str())
    };
    Ok(TaskEngine::new(store, identity, TerminalSink))
}

fn parse_status(value: &str) -> Result<TaskStatus, Box<dyn std::error::Error>> {
    match value {
        "todo" => Ok(TaskStatus::Todo),
        "doing" => Ok(TaskStatus::Doing),
        "done" => Ok(TaskStatus::Done),
        other => Err(format!("unknown status '{other}' (todo, doing, done)").into()),
    }
}

fn parse_priority(value: &str) -> Result<Priority, Box<dyn std::error::Error>> {
    match value {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(format!("unknown priority '{other}' (low, medium, high)").into()),
    }
}

fn parse_due(value: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .ok_or("invalid due date")?;
        return Ok(Utc.from_utc_datetime(&noon));
    }
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn print_line(task: &Task) {
    let due = task
        .due_date
        .map(|d| format!("  due {}", d.date_naive()))
        .unwrap_or_default();
    let subtasks = if task.subtasks.is_empty() {
        String::new()
    } else {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        format!("  [{done}/{}]", task.subtasks.len())
    };
    println!(
        "{}  {:<11} {:<6} {}{due}{subtasks}",
        task.id,
        format!("({})", task.status.label()),
        format!("{:?}", task.priority).to_lowercase(),
        task.title,
    );
}

fn report(applied: Applied) {
    if let Applied::Partial { warning } = applied {
        eprintln!("warning: {warning}");
    }
}

pub async fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut engine = build_engine(&config)?;
    engine.reload().await?;

    match action {
        TaskAction::List { group, json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&engine.sorted())?);
            } else if group {
                let today = Local::now().date_naive();
                for (bucket, tasks) in engine.grouped(today).iter() {
                    if tasks.is_empty() {
                        continue;
                    }
                    println!("{}", bucket.label().to_uppercase());
                    for task in tasks {
                        print_line(task);
                    }
                    println!();
                }
            } else {
                for task in engine.sorted() {
                    print_line(&task);
                }
            }
        }
        TaskAction::Add {
            title,
            description,
            priority,
            due,
            category,
            color,
        } => {
            let draft = TaskDraft {
                title,
                description,
                priority: priority.as_deref().map(parse_priority).transpose()?.unwrap_or_default(),
                due_date: due.as_deref().map(parse_due).transpose()?,
                category,
                color,
                ..TaskDraft::default()
            };
            let task = engine.create(draft).await?;
            println!("created {}", task.id);
        }
        TaskAction::Move { id, status, due } => {
            let target = match (status, due) {
                (Some(status), None) => MoveTarget::Status(parse_status(&status)?),
                (None, Some(due)) => MoveTarget::DueDate(parse_due(&due)?),
                _ => return Err("pass exactly one of --status or --due".into()),
            };
            report(engine.move_task(&id, target).await?);
        }
        TaskAction::Done { id } => {
            report(
                engine
                    .move_task(&id, MoveTarget::Status(TaskStatus::Done))
                    .await?,
            );
        }
        TaskAction::Edit {
            id,
            title,
            description,
            status,
            priority,
            due,
            category,
            color,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status: status.as_deref().map(parse_status).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                due_date: due.as_deref().map(parse_due).transpose()?,
                category,
                color,
                ..TaskPatch::default()
            };
            report(engine.update_details(&id, patch).await?);
        }
        TaskAction::SubtaskAdd { id, title } => {
            let mut subtasks = engine
                .get(&id)
                .map(|t| t.subtasks.clone())
                .unwrap_or_default();
            subtasks.push(Subtask::new(title));
            report(engine.replace_subtasks(&id, subtasks).await?);
        }
        TaskAction::Subtask { id, index } => {
            report(engine.toggle_subtask(&id, index).await?);
        }
        TaskAction::Delete { id, yes } => {
            if !yes {
                return Err("refusing to delete without --yes (deletion is irreversible)".into());
            }
            engine.delete(&id).await?;
            println!("deleted {id}");
        }
    }

    Ok(())
}
