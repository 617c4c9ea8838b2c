use crate::cmd::rule::RuleArgs;
use crate::output::{print_json, print_table, summarize_dates};
use anyhow::Context;
use clap::Subcommand;
use goalpath_core::{
    format_iso_dates, SqliteGoalRepository, SqliteTaskRepository, SwipeOutcome, Task, TaskDraft,
    TaskService,
};
use rusqlite::Connection;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task to a goal; dates are expanded over the goal window
    Add {
        goal_id: Uuid,
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// List tasks of a goal
    List { goal_id: Uuid },
    /// Edit a task; dates are recomputed from the (new) rule
    Edit {
        task_id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Mark a task completed (swipe right)
    Complete { task_id: Uuid },
    /// Mark a task failed (swipe left)
    Fail { task_id: Uuid },
    /// Delete a task
    Delete { task_id: Uuid },
}

pub fn run(conn: &Connection, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    let service = TaskService::new(
        SqliteGoalRepository::try_new(conn)?,
        SqliteTaskRepository::try_new(conn)?,
    );

    match subcmd {
        TaskSubcommand::Add {
            goal_id,
            title,
            description,
            rule,
        } => {
            let mut draft = TaskDraft::new(title.join(" "), rule.to_rule()?);
            draft.description = description;
            let task = service.add_task(goal_id, draft)?;
            if json {
                print_json(&task)?;
            } else {
                println!(
                    "Added task [{}]: {} ({}, {} date(s))",
                    task.uuid,
                    task.title,
                    task.kind,
                    task.selected_dates.len()
                );
            }
        }
        TaskSubcommand::List { goal_id } => {
            let tasks = service.list_tasks(goal_id)?;
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                print_table(
                    &["ID", "TITLE", "TYPE", "STATUS", "DATES"],
                    tasks.iter().map(task_row).collect(),
                );
            }
        }
        TaskSubcommand::Edit {
            task_id,
            title,
            description,
            rule,
        } => {
            let existing = service
                .get_task(task_id)?
                .with_context(|| format!("task not found: {task_id}"))?;
            let rule = if rule.is_empty() {
                existing.rule()
            } else {
                rule.to_rule()?
            };
            let draft = TaskDraft {
                title: title.unwrap_or(existing.title),
                description: description.or(existing.description),
                rule,
            };
            let task = service.update_task(task_id, draft)?;
            if json {
                print_json(&task)?;
            } else {
                println!(
                    "Updated task [{task_id}]: {} ({}, {} date(s))",
                    task.title,
                    task.kind,
                    task.selected_dates.len()
                );
            }
        }
        TaskSubcommand::Complete { task_id } => {
            swipe(&service, task_id, SwipeOutcome::Complete, json)?;
        }
        TaskSubcommand::Fail { task_id } => {
            swipe(&service, task_id, SwipeOutcome::Fail, json)?;
        }
        TaskSubcommand::Delete { task_id } => {
            service.delete_task(task_id)?;
            if json {
                print_json(&serde_json::json!({ "task_id": task_id, "deleted": true }))?;
            } else {
                println!("Deleted task [{task_id}]");
            }
        }
    }
    Ok(())
}

fn swipe(
    service: &TaskService<SqliteGoalRepository<'_>, SqliteTaskRepository<'_>>,
    task_id: Uuid,
    outcome: SwipeOutcome,
    json: bool,
) -> anyhow::Result<()> {
    let task = service.apply_swipe_outcome(task_id, outcome)?;
    if json {
        print_json(&task)?;
    } else {
        println!("Task [{task_id}] is now {}", task.status.as_str());
    }
    Ok(())
}

fn task_row(task: &Task) -> Vec<String> {
    vec![
        task.uuid.to_string(),
        task.title.clone(),
        rule_label(task),
        task.status.as_str().to_string(),
        summarize_dates(&format_iso_dates(&task.selected_dates), 3),
    ]
}

fn rule_label(task: &Task) -> String {
    match (task.selected_days_of_week, task.monthly_mode) {
        (Some(days), _) if days.is_empty() => format!("{} (no days)", task.kind),
        (Some(days), _) => format!("{} ({})", task.kind, days.labels().join(" ")),
        (_, Some(mode)) => format!("{} ({mode})", task.kind),
        _ => task.kind.to_string(),
    }
}
