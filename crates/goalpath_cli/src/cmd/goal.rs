use crate::cmd::rule::parse_date_arg;
use crate::output::{print_json, print_table};
use anyhow::{bail, Context};
use clap::Subcommand;
use goalpath_core::{
    format_iso_date, DateChange, GoalService, NaiveDate, SqliteGoalRepository,
    SqliteTaskRepository, SwipeOutcome, TaskService,
};
use rusqlite::Connection;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum GoalSubcommand {
    /// Create a goal
    Add {
        #[arg(required = true)]
        title: Vec<String>,
        /// First day of the goal (yyyy-MM-dd)
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        /// Last day of the goal (yyyy-MM-dd)
        #[arg(long, value_parser = parse_date_arg)]
        due: NaiveDate,
    },
    /// List goals ordered by window
    List,
    /// Change a goal's title (tasks are kept)
    Rename {
        id: Uuid,
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Move a goal's window; clears all of its tasks
    Reschedule {
        id: Uuid,
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date_arg)]
        due: NaiveDate,
        /// Confirm that existing tasks will be deleted
        #[arg(long)]
        yes: bool,
    },
    /// Mark every task of a goal completed (swipe the goal right)
    Complete { id: Uuid },
    /// Mark every task of a goal failed (swipe the goal left)
    Fail { id: Uuid },
    /// Delete a goal and its tasks
    Delete { id: Uuid },
}

pub fn run(conn: &Connection, subcmd: GoalSubcommand, json: bool) -> anyhow::Result<()> {
    let service = GoalService::new(SqliteGoalRepository::try_new(conn)?);

    match subcmd {
        GoalSubcommand::Add { title, start, due } => {
            let goal = service.create_goal(title.join(" "), start, due)?;
            if json {
                print_json(&goal)?;
            } else {
                println!(
                    "Created goal [{}]: {} ({} .. {})",
                    goal.uuid,
                    goal.title,
                    format_iso_date(goal.start_date),
                    format_iso_date(goal.due_date)
                );
            }
        }
        GoalSubcommand::List => {
            let goals = service.list_goals()?;
            if json {
                print_json(&goals)?;
            } else if goals.is_empty() {
                println!("No goals.");
            } else {
                let rows = goals
                    .iter()
                    .map(|goal| {
                        vec![
                            goal.uuid.to_string(),
                            goal.title.clone(),
                            format_iso_date(goal.start_date),
                            format_iso_date(goal.due_date),
                        ]
                    })
                    .collect();
                print_table(&["ID", "TITLE", "START", "DUE"], rows);
            }
        }
        GoalSubcommand::Rename { id, title } => {
            let goal = service
                .rename_goal(id, title.join(" "))
                .with_context(|| format!("failed to rename goal {id}"))?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Renamed goal [{id}]: {}", goal.title);
            }
        }
        GoalSubcommand::Reschedule {
            id,
            start,
            due,
            yes,
        } => match service.change_goal_dates(id, start, due, yes)? {
            DateChange::ConfirmationRequired { task_count } => {
                if json {
                    print_json(&serde_json::json!({
                        "goal_id": id,
                        "status": "confirmation_required",
                        "task_count": task_count,
                    }))?;
                }
                bail!(
                    "goal {id} has {task_count} task(s) that will be deleted; re-run with --yes to confirm"
                );
            }
            DateChange::Applied {
                goal,
                cleared_tasks,
            } => {
                if json {
                    print_json(&serde_json::json!({
                        "goal": goal,
                        "status": "applied",
                        "cleared_tasks": cleared_tasks,
                    }))?;
                } else {
                    println!(
                        "Rescheduled goal [{id}] to {} .. {}; cleared {cleared_tasks} task(s)",
                        format_iso_date(goal.start_date),
                        format_iso_date(goal.due_date)
                    );
                }
            }
        },
        GoalSubcommand::Complete { id } => swipe(conn, id, SwipeOutcome::Complete, json)?,
        GoalSubcommand::Fail { id } => swipe(conn, id, SwipeOutcome::Fail, json)?,
        GoalSubcommand::Delete { id } => {
            service
                .delete_goal(id)
                .with_context(|| format!("failed to delete goal {id}"))?;
            if json {
                print_json(&serde_json::json!({ "goal_id": id, "deleted": true }))?;
            } else {
                println!("Deleted goal [{id}]");
            }
        }
    }
    Ok(())
}

fn swipe(conn: &Connection, id: Uuid, outcome: SwipeOutcome, json: bool) -> anyhow::Result<()> {
    let service = TaskService::new(
        SqliteGoalRepository::try_new(conn)?,
        SqliteTaskRepository::try_new(conn)?,
    );
    let tasks = service.apply_goal_swipe_outcome(id, outcome)?;
    let status = outcome.task_status().as_str();
    if json {
        print_json(&serde_json::json!({
            "goal_id": id,
            "status": status,
            "tasks": tasks,
        }))?;
    } else {
        println!("Goal [{id}]: {} task(s) now {status}", tasks.len());
    }
    Ok(())
}
